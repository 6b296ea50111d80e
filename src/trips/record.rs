//! Typed trip rows: raw rows decoded from a monthly file, and the cleaned
//! standardized rows handed to downstream consumers.

use crate::frame_utils::datetime_column;
use crate::trips::airport::AirportTrip;
use crate::trips::trip_source::TripSource;
use crate::types::lat_lon::LatLon;
use chrono::NaiveDateTime;
use polars::prelude::*;

/// One trip as read from the source file. Only lives during cleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTripRecord {
    pub pickup_datetime: Option<NaiveDateTime>,
    pub dropoff_datetime: Option<NaiveDateTime>,
    pub pickup_zone: Option<i64>,
    pub dropoff_zone: Option<i64>,
    pub total_amount: Option<f64>,
    /// Optional numeric columns, aligned with [`MeasureColumns`].
    pub measures: Vec<Option<f64>>,
}

/// Names of the optional numeric columns present in one monthly file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeasureColumns(pub Vec<&'static str>);

impl MeasureColumns {
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|column| *column == name)
    }

    /// Value of column `name` in `values`, `None` when absent or null.
    pub fn get(&self, values: &[Option<f64>], name: &str) -> Option<f64> {
        self.index_of(name).and_then(|idx| values.get(idx).copied().flatten())
    }

    /// Sum of `names` when every one of them is present and non-null.
    pub fn sum_all(&self, values: &[Option<f64>], names: &[&str]) -> Option<f64> {
        names
            .iter()
            .map(|name| self.get(values, name))
            .sum::<Option<f64>>()
    }

    pub fn names(&self) -> &[&'static str] {
        &self.0
    }
}

/// A cleaned, geocoded trip. Pickup and dropoff coordinates are always set.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTripRecord {
    pub pickup_datetime: NaiveDateTime,
    pub dropoff_datetime: NaiveDateTime,
    pub pickup: LatLon,
    pub dropoff: LatLon,
    /// Day of week of the dropoff, Monday = 1.
    pub weekday: i32,
    pub total_amount: Option<f64>,
    pub airport: AirportTrip,
    pub measures: Vec<Option<f64>>,
}

/// The cleaned rows of one monthly file.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTrips {
    pub source: TripSource,
    pub file: String,
    pub measure_columns: MeasureColumns,
    pub records: Vec<CleanedTripRecord>,
}

impl CleanedTrips {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Encodes the rows into the standardized trip table.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let records = &self.records;
        let mut columns = vec![
            datetime_column("pickup_datetime", records.iter().map(|r| r.pickup_datetime))?,
            datetime_column("dropoff_datetime", records.iter().map(|r| r.dropoff_datetime))?,
            Column::new(
                "pickup_coordinates".into(),
                records.iter().map(|r| r.pickup.to_string()).collect::<Vec<_>>(),
            ),
            Column::new(
                "dropoff_coordinates".into(),
                records.iter().map(|r| r.dropoff.to_string()).collect::<Vec<_>>(),
            ),
            Column::new(
                "weekday".into(),
                records.iter().map(|r| r.weekday).collect::<Vec<i32>>(),
            ),
            Column::new(
                "total_amount".into(),
                records.iter().map(|r| r.total_amount).collect::<Vec<_>>(),
            ),
            Column::new(
                "airport".into(),
                records.iter().map(|r| r.airport.label()).collect::<Vec<_>>(),
            ),
        ];
        for (idx, name) in self.measure_columns.names().iter().enumerate() {
            let values: Vec<Option<f64>> = records.iter().map(|r| r.measures[idx]).collect();
            columns.push(Column::new((*name).into(), values));
        }
        DataFrame::new(columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Airport;
    use chrono::NaiveDate;

    fn record() -> CleanedTripRecord {
        let pickup = NaiveDate::from_ymd_opt(2021, 7, 5)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        CleanedTripRecord {
            pickup_datetime: pickup,
            dropoff_datetime: pickup + chrono::Duration::minutes(35),
            pickup: LatLon(40.76, -73.98),
            dropoff: LatLon(40.64, -73.78),
            weekday: 1,
            total_amount: Some(70.0),
            airport: AirportTrip::Airport(Airport::Jfk),
            measures: vec![Some(17.2), Some(0.0)],
        }
    }

    #[test]
    fn test_measure_lookup_and_sum() {
        let columns = MeasureColumns(vec!["fare_amount", "airport_fee"]);
        let values = [Some(52.0), Some(1.75)];
        assert_eq!(columns.get(&values, "airport_fee"), Some(1.75));
        assert_eq!(columns.get(&values, "tolls_amount"), None);
        assert_eq!(
            columns.sum_all(&values, &["fare_amount", "airport_fee"]),
            Some(53.75)
        );
        assert_eq!(columns.sum_all(&values, &["fare_amount", "tolls_amount"]), None);
        assert_eq!(columns.sum_all(&[Some(1.0), None], &["fare_amount", "airport_fee"]), None);
    }

    #[test]
    fn test_to_frame_schema() {
        let trips = CleanedTrips {
            source: TripSource::Taxi,
            file: "yellow_tripdata_2021-07.parquet".to_string(),
            measure_columns: MeasureColumns(vec!["trip_distance", "airport_fee"]),
            records: vec![record()],
        };
        let df = trips.to_frame().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(
            df.get_column_names_str(),
            vec![
                "pickup_datetime",
                "dropoff_datetime",
                "pickup_coordinates",
                "dropoff_coordinates",
                "weekday",
                "total_amount",
                "airport",
                "trip_distance",
                "airport_fee",
            ]
        );
        let coords = df.column("dropoff_coordinates").unwrap().str().unwrap().get(0);
        assert_eq!(coords, Some("40.64,-73.78"));
        let airport = df.column("airport").unwrap().str().unwrap().get(0);
        assert_eq!(airport, Some("JFK"));
    }

    #[test]
    fn test_empty_frame() {
        let trips = CleanedTrips {
            source: TripSource::RideHail,
            file: "fhvhv_tripdata_2021-07.parquet".to_string(),
            measure_columns: MeasureColumns::default(),
            records: vec![],
        };
        let df = trips.to_frame().unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 7);
    }
}
