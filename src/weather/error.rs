use crate::data_loader::DownloadError;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Download(#[from] DownloadError),

    #[error("Failed to read weather CSV '{path}'")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Missing required column '{column}' in {file}")]
    MissingColumn { file: String, column: String },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
