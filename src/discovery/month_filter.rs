//! Filters listing links down to the monthly trip files of one source.

use crate::discovery::error::DiscoveryError;
use crate::trips::trip_source::TripSource;
use log::{info, warn};
use regex::Regex;

/// Matches `<prefix>_trip[-_]data_YYYY-MM.parquet` for the configured years.
#[derive(Debug, Clone)]
pub struct MonthFilter {
    source: TripSource,
    pattern: Regex,
}

impl MonthFilter {
    pub fn new(
        source: TripSource,
        first_year: i32,
        last_year: i32,
    ) -> Result<Self, DiscoveryError> {
        let years = (first_year..=last_year)
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(
            r"(?i)(?:^|/){}_trip[-_]?data_(?:{})-(?:0[1-9]|1[0-2])\.parquet$",
            regex::escape(source.file_prefix()),
            years
        ))?;
        Ok(Self { source, pattern })
    }

    pub fn matches(&self, url: &str) -> bool {
        self.pattern.is_match(url.trim())
    }

    /// Keeps matching URLs in their original order.
    pub fn filter(&self, urls: &[String]) -> Vec<String> {
        urls.iter()
            .filter(|url| self.matches(url))
            .cloned()
            .collect()
    }

    /// Like [`MonthFilter::filter`], logging when the number of months differs
    /// from `expected`. A different count means files are missing or new upstream,
    /// it is not an error.
    pub fn filter_expecting(&self, urls: &[String], expected: usize) -> Vec<String> {
        let months = self.filter(urls);
        if months.len() == expected {
            info!("Discovered {} {} month files", months.len(), self.source);
        } else {
            warn!(
                "Discovered {} {} month files, expected {}",
                months.len(),
                self.source,
                expected
            );
        }
        months
    }
}

pub fn filter_taxi_months(urls: &[String]) -> Result<Vec<String>, DiscoveryError> {
    Ok(MonthFilter::new(TripSource::Taxi, 2020, 2024)?.filter(urls))
}

pub fn filter_ride_hail_months(urls: &[String]) -> Result<Vec<String>, DiscoveryError> {
    Ok(MonthFilter::new(TripSource::RideHail, 2020, 2024)?.filter(urls))
}
