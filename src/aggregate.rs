//! Combines per-file tables into one table per dataset.

use log::info;
use polars::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("No valid per-file results for the {dataset} dataset")]
    NoResults { dataset: String },

    #[error("Failed to concatenate {dataset} frames")]
    Concat {
        dataset: String,
        #[source]
        source: PolarsError,
    },
}

/// Stacks `frames` in order without deduplication.
///
/// Frames may differ in their optional columns; a column missing from one
/// frame is null for its rows.
pub fn concat_frames(dataset: &str, frames: Vec<DataFrame>) -> Result<DataFrame, AggregateError> {
    if frames.is_empty() {
        return Err(AggregateError::NoResults {
            dataset: dataset.to_string(),
        });
    }
    let count = frames.len();
    let lazy_frames: Vec<LazyFrame> = frames.into_iter().map(|df| df.lazy()).collect();
    let combined = concat_lf_diagonal(lazy_frames, UnionArgs::default())
        .and_then(LazyFrame::collect)
        .map_err(|source| AggregateError::Concat {
            dataset: dataset.to_string(),
            source,
        })?;
    info!(
        "Combined {} {} frames into {} rows",
        count,
        dataset,
        combined.height()
    );
    Ok(combined)
}
