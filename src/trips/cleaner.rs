//! Turns one raw monthly trip file into the standardized trip table:
//! subsample, enforce the column contract, geocode, derive fields and
//! classify airport trips.

use crate::data_loader::DataLoader;
use crate::frame_utils::{datetime_values, f64_values, i64_values};
use crate::sampling::SamplingConfig;
use crate::trips::airport::{classify_ride_hail, classify_taxi};
use crate::trips::error::TripDataError;
use crate::trips::record::{CleanedTripRecord, CleanedTrips, MeasureColumns, RawTripRecord};
use crate::trips::trip_source::{TripSource, RIDE_HAIL_OPERATOR};
use crate::types::weekday::weekday_number;
use crate::zones::zone_resolver::ZoneResolver;
use log::{debug, info};
use polars::prelude::*;
use std::fs::File;
use std::path::PathBuf;

const TOTAL_AMOUNT: &str = "total_amount";

/// Downloads (or reuses the cached copy of) `url` and cleans it.
pub async fn load_and_clean(
    loader: &DataLoader,
    source: TripSource,
    url: &str,
    zones: &ZoneResolver,
    sampling: &SamplingConfig,
) -> Result<CleanedTrips, TripDataError> {
    let path = loader.get_file(url).await?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| url.to_string());

    let df = tokio::task::spawn_blocking(move || read_parquet(path)).await??;
    info!("Read {} {} rows from {}", df.height(), source, file_name);

    clean_frame(source, df, zones, sampling, &file_name)
}

fn read_parquet(path: PathBuf) -> Result<DataFrame, TripDataError> {
    let file = File::open(&path).map_err(|e| TripDataError::FileOpen(path.clone(), e))?;
    ParquetReader::new(file)
        .finish()
        .map_err(|e| TripDataError::ParquetRead(path, e))
}

/// Cleans one month of raw trips. Deterministic for a given frame and seed.
pub fn clean_frame(
    source: TripSource,
    mut df: DataFrame,
    zones: &ZoneResolver,
    sampling: &SamplingConfig,
    file: &str,
) -> Result<CleanedTrips, TripDataError> {
    for (alias, canonical) in source.column_aliases() {
        let has_alias = df.get_column_index(alias).is_some();
        if has_alias && df.get_column_index(canonical).is_none() {
            df.rename(alias, (*canonical).into())?;
        }
    }

    let df = sample_frame(df, sampling)?;

    let required = source.required_columns();
    if let Some(missing) = required
        .iter()
        .find(|column| df.get_column_index(column).is_none())
    {
        return Err(TripDataError::MissingColumn {
            file: file.to_string(),
            column: missing.to_string(),
        });
    }

    let measure_columns = MeasureColumns(
        source
            .optional_columns()
            .iter()
            .copied()
            .filter(|column| df.get_column_index(column).is_some())
            .collect(),
    );
    let mut selected: Vec<&str> = required.clone();
    selected.extend(measure_columns.names().iter().copied());
    if df.get_column_index(TOTAL_AMOUNT).is_some() {
        selected.push(TOTAL_AMOUNT);
    }
    let mut df = df.select(selected)?;

    if source == TripSource::RideHail {
        let before = df.height();
        df = df
            .lazy()
            .filter(col("hvfhs_license_num").eq(lit(RIDE_HAIL_OPERATOR)))
            .collect()?;
        debug!(
            "Dropped {} rows of other operators from {}",
            before - df.height(),
            file
        );
    }

    let raw = decode_records(source, &df, &measure_columns)?;
    let raw_count = raw.len();
    let records: Vec<CleanedTripRecord> = raw
        .into_iter()
        .filter_map(|record| clean_record(source, record, zones, &measure_columns))
        .collect();
    if records.len() < raw_count {
        debug!(
            "Dropped {} of {} rows from {} without a timestamp or known zone",
            raw_count - records.len(),
            raw_count,
            file
        );
    }
    info!("Cleaned {} {} rows from {}", records.len(), source, file);

    Ok(CleanedTrips {
        source,
        file: file.to_string(),
        measure_columns,
        records,
    })
}

/// Seeded draw of `sample_size(height)` rows, without replacement.
fn sample_frame(df: DataFrame, sampling: &SamplingConfig) -> Result<DataFrame, TripDataError> {
    let height = df.height();
    if height == 0 {
        return Ok(df);
    }
    let n = sampling.sample_size(height)?.min(height);
    Ok(df.sample_n_literal(n, false, false, Some(sampling.seed))?)
}

fn decode_records(
    source: TripSource,
    df: &DataFrame,
    measure_columns: &MeasureColumns,
) -> Result<Vec<RawTripRecord>, TripDataError> {
    let (pickup_col, dropoff_col) = source.timestamp_columns();
    let pickups = datetime_values(df, pickup_col)?;
    let dropoffs = datetime_values(df, dropoff_col)?;
    let pickup_zones = i64_values(df, "PULocationID")?;
    let dropoff_zones = i64_values(df, "DOLocationID")?;
    let totals = match df.get_column_index(TOTAL_AMOUNT) {
        Some(_) => f64_values(df, TOTAL_AMOUNT)?,
        None => vec![None; df.height()],
    };
    let measures = measure_columns
        .names()
        .iter()
        .map(|name| f64_values(df, name))
        .collect::<PolarsResult<Vec<_>>>()?;

    Ok((0..df.height())
        .map(|row| RawTripRecord {
            pickup_datetime: pickups[row],
            dropoff_datetime: dropoffs[row],
            pickup_zone: pickup_zones[row],
            dropoff_zone: dropoff_zones[row],
            total_amount: totals[row],
            measures: measures.iter().map(|values| values[row]).collect(),
        })
        .collect())
}

/// Geocodes and completes one record; `None` drops the row.
fn clean_record(
    source: TripSource,
    record: RawTripRecord,
    zones: &ZoneResolver,
    measure_columns: &MeasureColumns,
) -> Option<CleanedTripRecord> {
    let pickup_datetime = record.pickup_datetime?;
    let dropoff_datetime = record.dropoff_datetime?;
    let pickup = zones.resolve(record.pickup_zone?).ok()?;
    let dropoff = zones.resolve(record.dropoff_zone?).ok()?;

    let mut measures = record.measures;
    let total_amount = record
        .total_amount
        .or_else(|| measure_columns.sum_all(&measures, source.total_components()));

    let airport = match source {
        TripSource::Taxi => classify_taxi(
            measure_columns.get(&measures, "RatecodeID"),
            measure_columns.get(&measures, "airport_fee"),
        ),
        TripSource::RideHail => classify_ride_hail(pickup, dropoff),
    };

    for column in source.zero_fill_columns() {
        if let Some(idx) = measure_columns.index_of(column) {
            measures[idx].get_or_insert(0.0);
        }
    }

    Some(CleanedTripRecord {
        pickup_datetime,
        dropoff_datetime,
        pickup,
        dropoff,
        weekday: weekday_number(dropoff_datetime.date()),
        total_amount,
        airport,
        measures,
    })
}
