//! Reprojection of zone polygons into WGS84 longitude/latitude.

use geo::{Coord, MapCoords, MultiPolygon};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;

pub(crate) const WGS84_EPSG: u32 = 4326;

const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// proj definitions of the reference systems NYC zone layers are published in.
fn proj_definition(epsg: u32) -> Option<&'static str> {
    match epsg {
        WGS84_EPSG => Some(WGS84),
        // NAD83 geographic
        4269 => Some("+proj=longlat +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +no_defs"),
        // NAD83 / New York Long Island (ftUS), the TLC shapefile's system
        2263 => Some(
            "+proj=lcc +lat_0=40.1666666666667 +lon_0=-74 +lat_1=41.0333333333333 \
             +lat_2=40.6666666666667 +x_0=300000 +y_0=0 +ellps=GRS80 \
             +towgs84=0,0,0,0,0,0,0 +units=us-ft +no_defs",
        ),
        // WGS 84 / UTM zone 18N
        32618 => Some("+proj=utm +zone=18 +datum=WGS84 +units=m +no_defs"),
        _ => None,
    }
}

/// EPSG code named by `name`: `EPSG:2263`, `urn:ogc:def:crs:EPSG::2263` or a
/// CRS84 URN, which is WGS84 in longitude/latitude order.
pub(crate) fn epsg_code(name: &str) -> Option<u32> {
    let name = name.trim().to_ascii_uppercase();
    if name.ends_with("CRS84") {
        return Some(WGS84_EPSG);
    }
    if !name.contains("EPSG") {
        return None;
    }
    name.rsplit(':').next()?.parse().ok()
}

/// Converts coordinates of one source reference system into WGS84 degrees.
pub(crate) struct Reprojection {
    source: Proj,
    target: Proj,
    source_geographic: bool,
}

impl Reprojection {
    /// `Ok(None)` when `epsg` already is WGS84, `Err` for codes without a
    /// known definition.
    pub(crate) fn to_wgs84(epsg: u32) -> Result<Option<Self>, String> {
        if epsg == WGS84_EPSG {
            return Ok(None);
        }
        let definition =
            proj_definition(epsg).ok_or_else(|| format!("no definition for EPSG:{epsg}"))?;
        let source = Proj::from_proj_string(definition).map_err(|e| format!("{e:?}"))?;
        let target = Proj::from_proj_string(WGS84).map_err(|e| format!("{e:?}"))?;
        Ok(Some(Self {
            source,
            target,
            source_geographic: definition.starts_with("+proj=longlat"),
        }))
    }

    pub(crate) fn coord(&self, coord: Coord<f64>) -> Result<Coord<f64>, String> {
        let mut point = if self.source_geographic {
            (coord.x.to_radians(), coord.y.to_radians(), 0.0)
        } else {
            (coord.x, coord.y, 0.0)
        };
        transform(&self.source, &self.target, &mut point).map_err(|e| format!("{e:?}"))?;
        Ok(Coord {
            x: point.0.to_degrees(),
            y: point.1.to_degrees(),
        })
    }

    pub(crate) fn polygon(&self, polygon: &MultiPolygon<f64>) -> Result<MultiPolygon<f64>, String> {
        polygon.try_map_coords(|coord| self.coord(coord))
    }
}
