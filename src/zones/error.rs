use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("Failed to read zone file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse zone file '{0}' as GeoJSON")]
    Parse(PathBuf, #[source] Box<geojson::Error>),

    #[error("Zone file '{0}' is not a FeatureCollection")]
    NotFeatureCollection(PathBuf),

    #[error("Zone file '{path}' uses coordinate reference '{found}': {reason}")]
    UnsupportedCrs {
        path: PathBuf,
        found: String,
        reason: String,
    },

    #[error("Zone coordinates can only be resolved to WGS84, not '{0}'")]
    UnsupportedTargetCrs(String),

    #[error("Zone file '{0}' contains no usable zones")]
    Empty(PathBuf),

    #[error("No zone with id {0}")]
    NotFound(i64),
}
