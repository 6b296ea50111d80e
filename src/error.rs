use crate::aggregate::AggregateError;
use crate::config::ConfigError;
use crate::data_loader::DownloadError;
use crate::discovery::error::DiscoveryError;
use crate::sampling::SamplingError;
use crate::trips::error::TripDataError;
use crate::weather::error::WeatherError;
use crate::zones::error::ZoneError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error(transparent)]
    Zone(#[from] ZoneError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error(transparent)]
    TripData(#[from] TripDataError),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),
}
