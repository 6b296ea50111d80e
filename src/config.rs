//! Pipeline configuration: file locations, source URLs, sampling and HTTP
//! settings, plus the geographic constants handed to map-rendering consumers.

use crate::sampling::SamplingConfig;
use crate::types::lat_lon::LatLon;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_LISTING_URL: &str = "https://www.nyc.gov/site/tlc/about/tlc-trip-record-data.page";

/// NOAA Local Climatological Data for Central Park (station 72505394728), one file per year.
pub const DEFAULT_WEATHER_URLS: [&str; 5] = [
    "https://www.ncei.noaa.gov/data/local-climatological-data/access/2020/72505394728.csv",
    "https://www.ncei.noaa.gov/data/local-climatological-data/access/2021/72505394728.csv",
    "https://www.ncei.noaa.gov/data/local-climatological-data/access/2022/72505394728.csv",
    "https://www.ncei.noaa.gov/data/local-climatological-data/access/2023/72505394728.csv",
    "https://www.ncei.noaa.gov/data/local-climatological-data/access/2024/72505394728.csv",
];

pub const DEFAULT_CRS: &str = "EPSG:4326";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: LatLon) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.0)
            && (self.min_lon..=self.max_lon).contains(&point.1)
    }
}

/// Greater New York City area.
pub const NYC_BOUNDS: BoundingBox = BoundingBox {
    min_lat: 40.4774,
    min_lon: -74.2591,
    max_lat: 40.9176,
    max_lon: -73.7004,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Airport {
    #[serde(rename = "JFK")]
    Jfk,
    #[serde(rename = "LGA")]
    Lga,
    #[serde(rename = "EWR")]
    Ewr,
}

impl Airport {
    /// Fixed iteration order used by the proximity classifier.
    pub const ALL: [Airport; 3] = [Airport::Jfk, Airport::Lga, Airport::Ewr];

    pub fn code(&self) -> &'static str {
        match self {
            Airport::Jfk => "JFK",
            Airport::Lga => "LGA",
            Airport::Ewr => "EWR",
        }
    }

    pub fn location(&self) -> LatLon {
        match self {
            Airport::Jfk => LatLon(40.6413, -73.7781),
            Airport::Lga => LatLon(40.7769, -73.8740),
            Airport::Ewr => LatLon(40.6895, -74.1745),
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        match self {
            Airport::Jfk => BoundingBox {
                min_lat: 40.6195,
                min_lon: -73.8317,
                max_lat: 40.6659,
                max_lon: -73.7463,
            },
            Airport::Lga => BoundingBox {
                min_lat: 40.7644,
                min_lon: -73.8896,
                max_lat: 40.7850,
                max_lon: -73.8546,
            },
            Airport::Ewr => BoundingBox {
                min_lat: 40.6700,
                min_lon: -74.1900,
                max_lat: 40.7070,
                max_lon: -74.1530,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connect timeout, and total deadline for listing-page requests.
    pub timeout_secs: u64,
    /// Longest pause between two reads of a response body.
    pub read_timeout_secs: u64,
    pub max_retries: u32,
    pub base_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            read_timeout_secs: 30,
            max_retries: 3,
            base_delay_ms: 1000,
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Year window {first}..={last} is empty")]
    EmptyYearWindow { first: i32, last: i32 },
}

/// Explicit configuration passed to [`crate::TripWeatherPipeline`].
///
/// Every field has a default, so a JSON config file only needs the values it
/// overrides:
///
/// ```
/// use nyc_trip_weather::PipelineConfig;
///
/// let config: PipelineConfig = serde_json::from_str(r#"{ "cache_dir": "/tmp/nyc" }"#).unwrap();
/// assert_eq!(config.cache_dir.to_str(), Some("/tmp/nyc"));
/// assert_eq!(config.expected_months, 57);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, bon::Builder)]
#[serde(default)]
pub struct PipelineConfig {
    /// Download cache; one file per remote file, named like the remote file.
    #[builder(into, default = PathBuf::from("data"))]
    pub cache_dir: PathBuf,
    /// Zone polygons as a GeoJSON FeatureCollection.
    #[builder(into, default = PathBuf::from("data/taxi_zones.geojson"))]
    pub zone_file: PathBuf,
    #[builder(into, default = DEFAULT_LISTING_URL.to_string())]
    pub listing_url: String,
    #[builder(default = DEFAULT_WEATHER_URLS.iter().map(|u| u.to_string()).collect())]
    pub weather_urls: Vec<String>,
    #[builder(into, default = DEFAULT_CRS.to_string())]
    pub crs: String,
    #[builder(default = 2020)]
    pub first_year: i32,
    #[builder(default = 2024)]
    pub last_year: i32,
    /// Month files discovery is expected to find per source; a different count is logged.
    #[builder(default = 57)]
    pub expected_months: usize,
    #[builder(default)]
    pub sampling: SamplingConfig,
    #[builder(default)]
    pub http: HttpConfig,
    #[builder(default = NYC_BOUNDS)]
    pub city_bounds: BoundingBox,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig::builder().build()
    }
}

impl PipelineConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        let config: PipelineConfig = serde_json::from_str(&text)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first_year > self.last_year {
            return Err(ConfigError::EmptyYearWindow {
                first: self.first_year,
                last: self.last_year,
            });
        }
        Ok(())
    }
}
