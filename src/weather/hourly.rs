//! Hourly weather cleaning: labels, severe-weather flag and calendar fields.

use crate::data_loader::DataLoader;
use crate::frame_utils::{date_column, datetime_column};
use crate::types::weekday::weekday_number;
use crate::weather::error::WeatherError;
use crate::weather::observation::{load_observations, Observation};
use crate::weather::weather_code::HourlyWeatherType;
use chrono::{NaiveDateTime, Timelike};
use log::info;
use polars::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyWeatherRecord {
    pub datetime: NaiveDateTime,
    /// `None` when the code has no hourly label and precipitation is known
    /// and non-zero.
    pub weather_type: Option<HourlyWeatherType>,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub windspeed: Option<f64>,
    pub weekday: i32,
    /// Three-valued: `None` when the label is unknown.
    pub severe_weather: Option<bool>,
}

impl HourlyWeatherRecord {
    pub fn hour(&self) -> u32 {
        self.datetime.hour()
    }
}

/// Label for one observation. Zero precipitation forces `Sunny`; missing
/// precipitation together with an unmapped code forces `Unknown`.
pub fn hourly_label(code: Option<&str>, precipitation: Option<f64>) -> Option<HourlyWeatherType> {
    let mapped = code.and_then(HourlyWeatherType::from_code);
    match (precipitation, mapped) {
        (Some(amount), _) if amount == 0.0 => Some(HourlyWeatherType::Sunny),
        (None, None) => Some(HourlyWeatherType::Unknown),
        (_, mapped) => mapped,
    }
}

pub fn clean_observation(observation: &Observation) -> HourlyWeatherRecord {
    let weather_type = hourly_label(observation.weather_code.as_deref(), observation.precipitation);
    let severe_weather = match weather_type {
        Some(label) => label.is_severe(),
        None => Some(false),
    };
    HourlyWeatherRecord {
        datetime: observation.datetime,
        weather_type,
        temperature: observation.temperature,
        precipitation: observation.precipitation,
        windspeed: observation.windspeed,
        weekday: weekday_number(observation.datetime.date()),
        severe_weather,
    }
}

pub fn hourly_frame(records: &[HourlyWeatherRecord]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        datetime_column("datetime", records.iter().map(|r| r.datetime))?,
        date_column("date", records.iter().map(|r| r.datetime.date()))?,
        Column::new(
            "hour".into(),
            records.iter().map(|r| r.hour() as i32).collect::<Vec<i32>>(),
        ),
        Column::new(
            "weather_type".into(),
            records
                .iter()
                .map(|r| r.weather_type.map(|label| label.label()))
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
        Column::new(
            "weekday".into(),
            records.iter().map(|r| r.weekday).collect::<Vec<i32>>(),
        ),
        Column::new(
            "severe_weather".into(),
            records
                .iter()
                .map(|r| r.severe_weather.map(i32::from))
                .collect::<Vec<Option<i32>>>(),
        ),
    ])
}

/// Hourly weather table for one yearly CSV.
pub async fn load_hourly(loader: &DataLoader, url: &str) -> Result<DataFrame, WeatherError> {
    let (file, observations) = load_observations(loader, url).await?;
    let records: Vec<HourlyWeatherRecord> = observations.iter().map(clean_observation).collect();
    info!("Cleaned {} hourly weather rows from {}", records.len(), file);
    Ok(hourly_frame(&records)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;
    use crate::weather::observation::read_observations;
    use crate::weather::observation::tests::{write_fixture, WEATHER_CSV};

    #[test]
    fn test_label_overrides() {
        assert_eq!(hourly_label(Some("-RA"), Some(0.0)), Some(HourlyWeatherType::Sunny));
        assert_eq!(hourly_label(None, None), Some(HourlyWeatherType::Unknown));
        // An unmapped code counts as missing.
        assert_eq!(hourly_label(Some("BLSN"), None), Some(HourlyWeatherType::Unknown));
        assert_eq!(hourly_label(Some("BLSN"), Some(0.2)), None);
        assert_eq!(hourly_label(Some("-RA"), None), Some(HourlyWeatherType::LightRain));
        assert_eq!(hourly_label(Some("+RA"), Some(0.5)), Some(HourlyWeatherType::HeavyRain));
    }

    #[test]
    fn test_clean_csv_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_fixture(dir.path(), "weather.csv", WEATHER_CSV);
        let records: Vec<HourlyWeatherRecord> = read_observations(&path)
            .unwrap()
            .iter()
            .map(clean_observation)
            .collect();

        assert_eq!(records[0].weather_type, Some(HourlyWeatherType::LightSnowMist));
        assert_eq!(records[0].severe_weather, Some(false));
        assert_eq!(records[1].weather_type, Some(HourlyWeatherType::HeavySnowFog));
        assert_eq!(records[1].severe_weather, Some(true));
        // 2021-01-31 was a Sunday.
        assert_eq!(records[1].weekday, 7);
        assert_eq!(records[1].hour(), 23);
        assert_eq!(records[3].weather_type, Some(HourlyWeatherType::Sunny));
        assert_eq!(records[3].severe_weather, Some(false));
        assert_eq!(records[4].weather_type, Some(HourlyWeatherType::Unknown));
        assert_eq!(records[4].severe_weather, None);

        let df = hourly_frame(&records).unwrap();
        assert_eq!(df.height(), 5);
        let severe = df.column("severe_weather").unwrap().i32().unwrap();
        assert_eq!(severe.get(1), Some(1));
        assert_eq!(severe.get(3), Some(0));
        assert_eq!(severe.get(4), None);
        let labels = df.column("weather_type").unwrap().str().unwrap();
        assert_eq!(labels.get(3), Some("sunny"));
        assert_eq!(labels.get(4), Some("unknown"));
    }

    #[tokio::test]
    async fn test_load_hourly_from_cache() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "72505394728.csv", WEATHER_CSV);
        let loader = DataLoader::new(dir.path(), HttpConfig::default()).unwrap();
        let df = load_hourly(&loader, "https://nonexistent.invalid/2021/72505394728.csv")
            .await
            .unwrap();
        assert_eq!(df.height(), 5);
        assert_eq!(df.width(), 9);
    }
}
