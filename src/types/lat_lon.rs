//! Geographic coordinate pair used for zone centroids, airports and the
//! `"lat,lon"` coordinate columns of the cleaned trip tables.

use std::fmt;
use std::num::ParseFloatError;
use std::str::FromStr;
use thiserror::Error;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use nyc_trip_weather::LatLon;
///
/// let jfk = LatLon(40.6413, -73.7781);
/// assert_eq!(jfk.to_string(), "40.6413,-73.7781");
/// assert_eq!("40.6413,-73.7781".parse::<LatLon>().unwrap(), jfk);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    /// Great-circle distance to `other` in kilometres (Earth radius 6371 km).
    pub fn distance_km(&self, other: &LatLon) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.0,
                longitude: self.1,
            },
            haversine::Location {
                latitude: other.0,
                longitude: other.1,
            },
            haversine::Units::Kilometers,
        )
    }
}

/// Formats as `"lat,lon"`. `f64`'s `Display` is the shortest representation
/// that parses back to the same value, so formatting and parsing round-trip.
impl fmt::Display for LatLon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseLatLonError {
    #[error("Coordinate '{0}' is not of the form 'lat,lon'")]
    Format(String),

    #[error("Coordinate component '{value}' is not a number")]
    Number {
        value: String,
        #[source]
        source: ParseFloatError,
    },
}

impl FromStr for LatLon {
    type Err = ParseLatLonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| ParseLatLonError::Format(s.to_string()))?;
        let parse = |value: &str| {
            value
                .trim()
                .parse::<f64>()
                .map_err(|source| ParseLatLonError::Number {
                    value: value.to_string(),
                    source,
                })
        };
        Ok(LatLon(parse(lat)?, parse(lon)?))
    }
}
