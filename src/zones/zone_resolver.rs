//! Loads taxi zone polygons once and resolves zone ids to their centroid.

use crate::types::lat_lon::LatLon;
use crate::zones::error::ZoneError;
use crate::zones::projection::{epsg_code, Reprojection, WGS84_EPSG};
use geo::{Centroid, MultiPolygon};
use geojson::{Feature, GeoJson};
use log::{info, warn};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// A named zone polygon with its precomputed centroid.
#[derive(Debug, Clone)]
pub struct Zone {
    pub id: i64,
    pub name: String,
    pub borough: String,
    pub polygon: MultiPolygon<f64>,
    pub centroid: LatLon,
}

/// Zone id -> centroid lookup, constructed once and shared by reference
/// with every trip cleaning call.
#[derive(Debug, Clone)]
pub struct ZoneResolver {
    zones: HashMap<i64, Zone>,
}

fn declared_crs(collection: &geojson::FeatureCollection) -> Option<String> {
    collection
        .foreign_members
        .as_ref()?
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()
        .map(str::to_string)
}

fn property_id(feature: &Feature) -> Option<i64> {
    let value = feature
        .property("LocationID")
        .or_else(|| feature.property("location_id"))?;
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            let f = n.as_f64()?;
            (f.fract() == 0.0).then_some(f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn property_string(feature: &Feature, key: &str) -> String {
    feature
        .property(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn feature_polygon(feature: &Feature) -> Option<MultiPolygon<f64>> {
    let geometry = feature.geometry.clone()?;
    let geo_geom: geo::Geometry<f64> = geometry.try_into().ok()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Some(mp),
        geo::Geometry::Polygon(p) => Some(MultiPolygon(vec![p])),
        _ => None,
    }
}

impl ZoneResolver {
    /// Reads a GeoJSON FeatureCollection of zones from `path`.
    ///
    /// `crs` is the reference system resolved coordinates are returned in and
    /// must be WGS84. Polygons in another system, declared through a legacy
    /// `crs` member, are reprojected before centroids are computed.
    pub fn from_file(path: &Path, crs: &str) -> Result<Self, ZoneError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| ZoneError::Read(path.to_path_buf(), e))?;
        let resolver = Self::from_geojson_str(&text, crs, path)?;
        info!("Loaded {} zones from {:?}", resolver.len(), path);
        Ok(resolver)
    }

    pub fn from_geojson_str(text: &str, crs: &str, origin: &Path) -> Result<Self, ZoneError> {
        let geojson: GeoJson = text
            .parse()
            .map_err(|e| ZoneError::Parse(origin.to_path_buf(), Box::new(e)))?;
        let GeoJson::FeatureCollection(collection) = geojson else {
            return Err(ZoneError::NotFeatureCollection(origin.to_path_buf()));
        };

        if epsg_code(crs) != Some(WGS84_EPSG) {
            return Err(ZoneError::UnsupportedTargetCrs(crs.to_string()));
        }
        let found = declared_crs(&collection).unwrap_or_else(|| "EPSG:4326".to_string());
        let unsupported = |reason: String| ZoneError::UnsupportedCrs {
            path: origin.to_path_buf(),
            found: found.clone(),
            reason,
        };
        let epsg = epsg_code(&found).ok_or_else(|| unsupported("not an EPSG code".to_string()))?;
        let reprojection = Reprojection::to_wgs84(epsg).map_err(unsupported)?;
        if reprojection.is_some() {
            info!("Reprojecting zones from {} to WGS84", found);
        }

        let mut zones = HashMap::new();
        for feature in &collection.features {
            let Some(id) = property_id(feature) else {
                warn!("Skipping zone feature without a LocationID");
                continue;
            };
            let Some(polygon) = feature_polygon(feature) else {
                warn!("Skipping zone {id} without a polygon geometry");
                continue;
            };
            let polygon = match &reprojection {
                Some(reprojection) => match reprojection.polygon(&polygon) {
                    Ok(projected) => projected,
                    Err(e) => {
                        warn!("Skipping zone {id} that failed to reproject: {e}");
                        continue;
                    }
                },
                None => polygon,
            };
            let Some(point) = polygon.centroid() else {
                warn!("Skipping zone {id} with a degenerate polygon");
                continue;
            };
            // Duplicate ids keep the first polygon.
            zones.entry(id).or_insert_with(|| Zone {
                id,
                name: property_string(feature, "zone"),
                borough: property_string(feature, "borough"),
                polygon,
                centroid: LatLon(point.y(), point.x()),
            });
        }

        if zones.is_empty() {
            return Err(ZoneError::Empty(PathBuf::from(origin)));
        }
        Ok(Self { zones })
    }

    /// Centroid of zone `zone_id`, or [`ZoneError::NotFound`].
    pub fn resolve(&self, zone_id: i64) -> Result<LatLon, ZoneError> {
        self.zones
            .get(&zone_id)
            .map(|zone| zone.centroid)
            .ok_or(ZoneError::NotFound(zone_id))
    }

    pub fn zone(&self, zone_id: i64) -> Option<&Zone> {
        self.zones.get(&zone_id)
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Three square zones: 1 around JFK, 2 in Midtown, 3 around LaGuardia.
    pub(crate) const ZONES_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "LocationID": 1, "zone": "JFK Airport", "borough": "Queens" },
                "geometry": { "type": "Polygon", "coordinates": [[
                    [-73.79, 40.63], [-73.77, 40.63], [-73.77, 40.65], [-73.79, 40.65], [-73.79, 40.63]
                ]] }
            },
            {
                "type": "Feature",
                "properties": { "LocationID": "2", "zone": "Midtown Center", "borough": "Manhattan" },
                "geometry": { "type": "MultiPolygon", "coordinates": [[[
                    [-73.99, 40.75], [-73.97, 40.75], [-73.97, 40.77], [-73.99, 40.77], [-73.99, 40.75]
                ]]] }
            },
            {
                "type": "Feature",
                "properties": { "LocationID": 3, "zone": "LaGuardia Airport", "borough": "Queens" },
                "geometry": { "type": "Polygon", "coordinates": [[
                    [-73.884, 40.767], [-73.864, 40.767], [-73.864, 40.787], [-73.884, 40.787], [-73.884, 40.767]
                ]] }
            },
            {
                "type": "Feature",
                "properties": { "LocationID": 2, "zone": "Duplicate", "borough": "Nowhere" },
                "geometry": { "type": "Polygon", "coordinates": [[
                    [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]
                ]] }
            },
            {
                "type": "Feature",
                "properties": { "LocationID": 264, "zone": "NV", "borough": "Unknown" },
                "geometry": null
            }
        ]
    }"#;

    pub(crate) fn test_resolver() -> ZoneResolver {
        ZoneResolver::from_geojson_str(ZONES_GEOJSON, "EPSG:4326", Path::new("zones.geojson"))
            .unwrap()
    }

    #[test]
    fn test_resolve_centroid() {
        let resolver = test_resolver();
        let centroid = resolver.resolve(1).unwrap();
        assert!((centroid.0 - 40.64).abs() < 1e-9);
        assert!((centroid.1 + 73.78).abs() < 1e-9);
        assert_eq!(resolver.zone(1).unwrap().borough, "Queens");
    }

    #[test]
    fn test_string_ids_and_duplicates_keep_first() {
        let resolver = test_resolver();
        let midtown = resolver.zone(2).unwrap();
        assert_eq!(midtown.name, "Midtown Center");
        assert!((midtown.centroid.0 - 40.76).abs() < 1e-9);
        assert_eq!(resolver.len(), 3);
    }

    #[test]
    fn test_missing_zone_is_not_found() {
        let resolver = test_resolver();
        assert!(matches!(resolver.resolve(264), Err(ZoneError::NotFound(264))));
        assert!(matches!(resolver.resolve(999), Err(ZoneError::NotFound(999))));
    }

    fn load(text: &str, crs: &str) -> Result<ZoneResolver, ZoneError> {
        ZoneResolver::from_geojson_str(text, crs, Path::new("z.geojson"))
    }

    /// Two 1000 ft squares in NY State Plane: one centred on the projection
    /// origin, one 10 km east of it.
    const STATE_PLANE_GEOJSON: &str = r#"{
        "type": "FeatureCollection",
        "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::2263" } },
        "features": [
            {
                "type": "Feature",
                "properties": { "LocationID": 7, "zone": "Origin", "borough": "Staten Island" },
                "geometry": { "type": "Polygon", "coordinates": [[
                    [983750.0, -500.0], [984750.0, -500.0], [984750.0, 500.0], [983750.0, 500.0], [983750.0, -500.0]
                ]] }
            },
            {
                "type": "Feature",
                "properties": { "LocationID": 8, "zone": "East", "borough": "Brooklyn" },
                "geometry": { "type": "Polygon", "coordinates": [[
                    [1016558.3, -500.0], [1017558.3, -500.0], [1017558.3, 500.0], [1016558.3, 500.0], [1016558.3, -500.0]
                ]] }
            }
        ]
    }"#;

    #[test]
    fn test_reprojects_state_plane_zones() {
        let resolver = load(STATE_PLANE_GEOJSON, "EPSG:4326").unwrap();
        let origin = resolver.resolve(7).unwrap();
        assert!((origin.0 - 40.166_666_7).abs() < 1e-4, "{origin:?}");
        assert!((origin.1 + 74.0).abs() < 1e-4, "{origin:?}");

        let east = resolver.resolve(8).unwrap();
        assert!((east.0 - 40.1666).abs() < 1e-3, "{east:?}");
        assert!((east.1 + 73.8826).abs() < 2e-3, "{east:?}");
    }

    #[test]
    fn test_rejects_unknown_crs() {
        let text = r#"{
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:EPSG::3035" } },
            "features": []
        }"#;
        assert!(matches!(
            load(text, "EPSG:4326"),
            Err(ZoneError::UnsupportedCrs { .. })
        ));
        assert!(matches!(
            load(ZONES_GEOJSON, "EPSG:2263"),
            Err(ZoneError::UnsupportedTargetCrs(_))
        ));
    }

    #[test]
    fn test_non_integral_location_id_is_skipped() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "LocationID": 12.7, "zone": "Fraction", "borough": "Queens" },
                    "geometry": { "type": "Polygon", "coordinates": [[
                        [-73.79, 40.63], [-73.77, 40.63], [-73.77, 40.65], [-73.79, 40.65], [-73.79, 40.63]
                    ]] }
                },
                {
                    "type": "Feature",
                    "properties": { "LocationID": 13.0, "zone": "Whole", "borough": "Queens" },
                    "geometry": { "type": "Polygon", "coordinates": [[
                        [-73.79, 40.63], [-73.77, 40.63], [-73.77, 40.65], [-73.79, 40.65], [-73.79, 40.63]
                    ]] }
                }
            ]
        }"#;
        let resolver = load(text, "EPSG:4326").unwrap();
        assert!(resolver.zone(12).is_none());
        assert_eq!(resolver.zone(13).unwrap().name, "Whole");
        assert_eq!(resolver.len(), 1);
    }

    #[test]
    fn test_accepts_crs84_and_rejects_empty() {
        let text = r#"{
            "type": "FeatureCollection",
            "crs": { "type": "name", "properties": { "name": "urn:ogc:def:crs:OGC:1.3:CRS84" } },
            "features": []
        }"#;
        let result = ZoneResolver::from_geojson_str(text, "EPSG:4326", Path::new("z.geojson"));
        assert!(matches!(result, Err(ZoneError::Empty(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("taxi_zones.geojson");
        std::fs::write(&path, ZONES_GEOJSON).unwrap();
        let resolver = ZoneResolver::from_file(&path, "EPSG:4326").unwrap();
        assert_eq!(resolver.len(), 3);
        assert!(matches!(
            ZoneResolver::from_file(&dir.path().join("missing.geojson"), "EPSG:4326"),
            Err(ZoneError::Read(..))
        ));
    }
}
