//! Sampling, geocoding and harmonization of NYC taxi, ride-hail and weather
//! datasets into standardized Polars tables.

mod aggregate;
mod config;
mod data_loader;
mod discovery;
mod error;
mod frame_utils;
mod pipeline;
mod retry;
mod sampling;
#[cfg(test)]
mod test_server;
mod trips;
mod types;
mod weather;
mod zones;

pub use error::PipelineError;
pub use pipeline::*;

pub use aggregate::{concat_frames, AggregateError};
pub use config::*;
pub use data_loader::{file_name_from_url, DataLoader, DownloadError};
pub use retry::{send_with_retry, RequestFailure};
pub use sampling::{sample_size, SamplingConfig, SamplingError};

pub use discovery::error::DiscoveryError;
pub use discovery::link_lister::{extract_links, list_links};
pub use discovery::month_filter::{filter_ride_hail_months, filter_taxi_months, MonthFilter};

pub use trips::airport::{
    classify_ride_hail, classify_taxi, AirportTrip, AIRPORT_RADIUS_KM, LGA_AIRPORT_FEE,
};
pub use trips::cleaner::{clean_frame, load_and_clean};
pub use trips::error::TripDataError;
pub use trips::record::{CleanedTripRecord, CleanedTrips, MeasureColumns, RawTripRecord};
pub use trips::trip_source::{TripSource, RIDE_HAIL_OPERATOR};

pub use weather::daily::{aggregate_daily, daily_frame, load_daily, DailyWeatherRecord};
pub use weather::error::WeatherError;
pub use weather::hourly::{
    clean_observation, hourly_frame, hourly_label, load_hourly, HourlyWeatherRecord,
};
pub use weather::observation::{load_observations, read_observations, Observation};
pub use weather::weather_code::{normalize_code, DailyWeatherType, HourlyWeatherType};

pub use types::lat_lon::{LatLon, ParseLatLonError};
pub use types::weekday::weekday_number;

pub use zones::error::ZoneError;
pub use zones::zone_resolver::{Zone, ZoneResolver};
