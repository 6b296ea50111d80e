//! Daily weather rollup with the coarse rain/snow/other categories.

use crate::data_loader::DataLoader;
use crate::frame_utils::date_column;
use crate::weather::error::WeatherError;
use crate::weather::observation::{load_observations, Observation};
use crate::weather::weather_code::DailyWeatherType;
use chrono::NaiveDate;
use log::info;
use polars::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyWeatherRecord {
    pub date: NaiveDate,
    pub weather_type: DailyWeatherType,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub windspeed: Option<f64>,
}

#[derive(Default)]
struct DayAccumulator {
    weather_type: DailyWeatherType,
    temperature: MeanAccumulator,
    precipitation: MeanAccumulator,
    windspeed: MeanAccumulator,
}

/// Running mean over the present values only.
#[derive(Default)]
struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    fn push(&mut self, value: Option<f64>) {
        if let Some(value) = value {
            self.sum += value;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Groups observations by calendar date, ordered by date.
pub fn aggregate_daily(observations: &[Observation]) -> Vec<DailyWeatherRecord> {
    let mut days: BTreeMap<NaiveDate, DayAccumulator> = BTreeMap::new();
    for observation in observations {
        let day = days.entry(observation.datetime.date()).or_default();
        let category = DailyWeatherType::from_code(observation.weather_code.as_deref());
        day.weather_type = DailyWeatherType::dominant([day.weather_type, category]);
        day.temperature.push(observation.temperature);
        day.precipitation.push(observation.precipitation);
        day.windspeed.push(observation.windspeed);
    }

    days.into_iter()
        .map(|(date, day)| DailyWeatherRecord {
            date,
            weather_type: day.weather_type,
            temperature: day.temperature.mean(),
            precipitation: day.precipitation.mean(),
            windspeed: day.windspeed.mean(),
        })
        .collect()
}

pub fn daily_frame(records: &[DailyWeatherRecord]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        date_column("date", records.iter().map(|r| r.date))?,
        Column::new(
            "weather_type".into(),
            records
                .iter()
                .map(|r| r.weather_type.label())
                .collect::<Vec<_>>(),
        ),
        Column::new(
            "temperature".into(),
            records.iter().map(|r| r.temperature).collect::<Vec<_>>(),
        ),
        Column::new(
            "precipitation".into(),
            records.iter().map(|r| r.precipitation).collect::<Vec<_>>(),
        ),
        Column::new(
            "windspeed".into(),
            records.iter().map(|r| r.windspeed).collect::<Vec<_>>(),
        ),
    ])
}

/// Daily weather table for one yearly CSV.
pub async fn load_daily(loader: &DataLoader, url: &str) -> Result<DataFrame, WeatherError> {
    let (file, observations) = load_observations(loader, url).await?;
    let records = aggregate_daily(&observations);
    info!("Aggregated {} days of weather from {}", records.len(), file);
    Ok(daily_frame(&records)?)
}
