//! Column decoding/encoding helpers between Polars frames and typed records.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use polars::prelude::*;

/// Days from 0001-01-01 to 1970-01-01, the epoch of Polars `Date` columns.
const EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub(crate) fn f64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

pub(crate) fn i64_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<i64>>> {
    let column = df.column(name)?.cast(&DataType::Int64)?;
    Ok(column.i64()?.into_iter().collect())
}

pub(crate) fn str_values(df: &DataFrame, name: &str) -> PolarsResult<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_string))
        .collect())
}

/// Timestamps of any precision, decoded as naive (UTC wall clock) datetimes.
pub(crate) fn datetime_values(
    df: &DataFrame,
    name: &str,
) -> PolarsResult<Vec<Option<NaiveDateTime>>> {
    let column = df
        .column(name)?
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;
    Ok(column
        .i64()?
        .into_iter()
        .map(|ms| ms.and_then(DateTime::from_timestamp_millis).map(|dt| dt.naive_utc()))
        .collect())
}

pub(crate) fn datetime_column(
    name: &str,
    values: impl Iterator<Item = NaiveDateTime>,
) -> PolarsResult<Column> {
    let millis: Vec<i64> = values.map(|v| v.and_utc().timestamp_millis()).collect();
    Column::new(name.into(), millis).cast(&DataType::Datetime(TimeUnit::Milliseconds, None))
}

pub(crate) fn date_column(
    name: &str,
    values: impl Iterator<Item = NaiveDate>,
) -> PolarsResult<Column> {
    let days: Vec<i32> = values
        .map(|date| date.num_days_from_ce() - EPOCH_DAYS_FROM_CE)
        .collect();
    Column::new(name.into(), days).cast(&DataType::Date)
}
