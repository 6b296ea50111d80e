//! Raw weather observations read from one yearly LCD CSV file.

use crate::data_loader::DataLoader;
use crate::frame_utils::str_values;
use crate::weather::error::WeatherError;
use crate::weather::weather_code::normalize_code;
use chrono::NaiveDateTime;
use log::{debug, info};
use polars::prelude::*;
use std::path::{Path, PathBuf};

/// Source column and its standardized name.
pub(crate) const WEATHER_COLUMNS: [(&str, &str); 5] = [
    ("DATE", "datetime"),
    ("HourlyPresentWeatherType", "weather_type"),
    ("HourlyDryBulbTemperature", "temperature"),
    ("HourlyPrecipitation", "precipitation"),
    ("HourlyWindSpeed", "windspeed"),
];

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// One row of the CSV after column selection and coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub datetime: NaiveDateTime,
    /// Normalized present-weather code, see [`normalize_code`].
    pub weather_code: Option<String>,
    pub temperature: Option<f64>,
    pub precipitation: Option<f64>,
    pub windspeed: Option<f64>,
}

pub(crate) fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Non-numeric values (trace markers, flags, blanks) become missing.
pub(crate) fn parse_number(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Downloads (or reuses the cached copy of) `url` and reads its observations.
pub async fn load_observations(
    loader: &DataLoader,
    url: &str,
) -> Result<(String, Vec<Observation>), WeatherError> {
    let path = loader.get_file(url).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| url.to_string());
    let observations = tokio::task::spawn_blocking(move || read_observations(&path)).await??;
    info!("Read {} weather rows from {}", observations.len(), file_name);
    Ok((file_name, observations))
}

pub fn read_observations(path: &Path) -> Result<Vec<Observation>, WeatherError> {
    let df = read_csv(path.to_path_buf())?;
    let file = path.display().to_string();
    observations_from_frame(&df, &file)
}

fn read_csv(path: PathBuf) -> Result<DataFrame, WeatherError> {
    // Every column as string; coercion happens per field.
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.clone()))
        .and_then(|reader| reader.finish())
        .map_err(|source| WeatherError::CsvRead { path, source })
}

pub(crate) fn observations_from_frame(
    df: &DataFrame,
    file: &str,
) -> Result<Vec<Observation>, WeatherError> {
    if let Some((missing, _)) = WEATHER_COLUMNS
        .iter()
        .find(|(column, _)| df.get_column_index(column).is_none())
    {
        return Err(WeatherError::MissingColumn {
            file: file.to_string(),
            column: missing.to_string(),
        });
    }
    let mut df = df.select(WEATHER_COLUMNS.map(|(column, _)| column))?;
    for (column, renamed) in WEATHER_COLUMNS {
        df.rename(column, renamed.into())?;
    }

    let timestamps = str_values(&df, "datetime")?;
    let codes = str_values(&df, "weather_type")?;
    let temperatures = str_values(&df, "temperature")?;
    let precipitation = str_values(&df, "precipitation")?;
    let windspeeds = str_values(&df, "windspeed")?;

    let mut dropped = 0usize;
    let observations: Vec<Observation> = (0..df.height())
        .filter_map(|row| {
            let datetime = timestamps[row].as_deref().and_then(parse_timestamp);
            if datetime.is_none() {
                dropped += 1;
            }
            Some(Observation {
                datetime: datetime?,
                weather_code: codes[row].as_deref().and_then(normalize_code),
                temperature: parse_number(temperatures[row].as_deref()),
                precipitation: parse_number(precipitation[row].as_deref()),
                windspeed: parse_number(windspeeds[row].as_deref()),
            })
        })
        .collect();
    if dropped > 0 {
        debug!("Dropped {} rows with an unparsable timestamp from {}", dropped, file);
    }
    Ok(observations)
}
