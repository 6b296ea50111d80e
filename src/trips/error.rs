use crate::data_loader::DownloadError;
use crate::sampling::SamplingError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TripDataError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("Failed to open trip file '{0}'")]
    FileOpen(PathBuf, #[source] std::io::Error),

    #[error("Failed to read parquet file '{0}'")]
    ParquetRead(PathBuf, #[source] PolarsError),

    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error(transparent)]
    Sampling(#[from] SamplingError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
