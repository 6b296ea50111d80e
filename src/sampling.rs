//! Statistically justified subsample sizes (Cochran's formula with
//! finite-population correction).

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SamplingError {
    #[error("Unsupported confidence level {0}; expected one of 0.90, 0.95, 0.99")]
    UnsupportedConfidence(f64),

    #[error("Margin of error must be in (0, 1), got {0}")]
    InvalidMarginOfError(f64),

    #[error("Assumed proportion must be in [0, 1], got {0}")]
    InvalidProportion(f64),
}

/// Sampling parameters plus the seed that makes every draw reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    pub confidence: f64,
    pub margin_of_error: f64,
    pub proportion: f64,
    pub seed: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            confidence: 0.95,
            margin_of_error: 0.05,
            proportion: 0.5,
            seed: 42,
        }
    }
}

impl SamplingConfig {
    pub fn sample_size(&self, population: usize) -> Result<usize, SamplingError> {
        sample_size(
            population,
            self.confidence,
            self.margin_of_error,
            self.proportion,
        )
    }
}

/// Two-sided z-score for the supported confidence levels. No interpolation.
fn z_score(confidence: f64) -> Result<f64, SamplingError> {
    const TABLE: [(f64, f64); 3] = [(0.90, 1.645), (0.95, 1.96), (0.99, 2.576)];
    TABLE
        .iter()
        .find(|(level, _)| (level - confidence).abs() < 1e-9)
        .map(|(_, z)| *z)
        .ok_or(SamplingError::UnsupportedConfidence(confidence))
}

/// Computes the number of rows to draw from a population of `population` rows.
///
/// `n0 = z² · p · (1 − p) / e²`, corrected for a finite population as
/// `n = ceil(n0 · N / (n0 + N − 1))`. For an empty population the uncorrected
/// `ceil(n0)` is returned. The result is never below 1.
///
/// # Errors
///
/// Returns [`SamplingError::UnsupportedConfidence`] unless `confidence` is one of
/// 0.90, 0.95 or 0.99, and the other variants for out-of-range parameters.
///
/// # Examples
///
/// ```
/// use nyc_trip_weather::sample_size;
///
/// assert_eq!(sample_size(1000, 0.95, 0.05, 0.5).unwrap(), 278);
/// assert!(sample_size(1000, 0.80, 0.05, 0.5).is_err());
/// ```
pub fn sample_size(
    population: usize,
    confidence: f64,
    margin_of_error: f64,
    proportion: f64,
) -> Result<usize, SamplingError> {
    let z = z_score(confidence)?;
    if !(margin_of_error > 0.0 && margin_of_error < 1.0) {
        return Err(SamplingError::InvalidMarginOfError(margin_of_error));
    }
    if !(0.0..=1.0).contains(&proportion) {
        return Err(SamplingError::InvalidProportion(proportion));
    }

    let n0 = z * z * proportion * (1.0 - proportion) / (margin_of_error * margin_of_error);
    let n = if population > 0 {
        let big_n = population as f64;
        (n0 * big_n / (n0 + big_n - 1.0)).ceil()
    } else {
        n0.ceil()
    };
    Ok((n as usize).max(1))
}
