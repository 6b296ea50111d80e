//! Airport-trip classification. Taxi and ride-hail data use two different
//! heuristics and are kept as separate rule sets.

use crate::config::Airport;
use crate::types::lat_lon::LatLon;
use std::fmt;

/// Taxi airport fee charged on LaGuardia pickups.
pub const LGA_AIRPORT_FEE: f64 = 1.75;

/// Radius around an airport's reference point counted as an airport trip.
pub const AIRPORT_RADIUS_KM: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirportTrip {
    NotAirport,
    Airport(Airport),
}

impl AirportTrip {
    pub fn label(&self) -> &'static str {
        match self {
            AirportTrip::NotAirport => "none",
            AirportTrip::Airport(airport) => airport.code(),
        }
    }
}

impl fmt::Display for AirportTrip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Taxi rule: rate code 2 is JFK, rate code 3 is Newark, otherwise the
/// LaGuardia airport fee marks an LGA trip.
pub fn classify_taxi(rate_code: Option<f64>, airport_fee: Option<f64>) -> AirportTrip {
    match rate_code {
        Some(code) if code == 2.0 => AirportTrip::Airport(Airport::Jfk),
        Some(code) if code == 3.0 => AirportTrip::Airport(Airport::Ewr),
        _ => match airport_fee {
            Some(fee) if (fee - LGA_AIRPORT_FEE).abs() < f64::EPSILON => {
                AirportTrip::Airport(Airport::Lga)
            }
            _ => AirportTrip::NotAirport,
        },
    }
}

fn nearest_airport_within(point: LatLon, radius_km: f64) -> Option<Airport> {
    Airport::ALL
        .into_iter()
        .find(|airport| point.distance_km(&airport.location()) <= radius_km)
}

/// Ride-hail rule: the first airport (in [`Airport::ALL`] order) within
/// [`AIRPORT_RADIUS_KM`] of the pickup, else of the dropoff.
pub fn classify_ride_hail(pickup: LatLon, dropoff: LatLon) -> AirportTrip {
    nearest_airport_within(pickup, AIRPORT_RADIUS_KM)
        .or_else(|| nearest_airport_within(dropoff, AIRPORT_RADIUS_KM))
        .map_or(AirportTrip::NotAirport, AirportTrip::Airport)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIDTOWN: LatLon = LatLon(40.7549, -73.9840);

    #[test]
    fn test_taxi_rate_code_jfk_regardless_of_fee() {
        assert_eq!(
            classify_taxi(Some(2.0), Some(1.75)),
            AirportTrip::Airport(Airport::Jfk)
        );
        assert_eq!(classify_taxi(Some(2.0), None), AirportTrip::Airport(Airport::Jfk));
    }

    #[test]
    fn test_taxi_rate_code_newark() {
        assert_eq!(
            classify_taxi(Some(3.0), Some(0.0)),
            AirportTrip::Airport(Airport::Ewr)
        );
    }

    #[test]
    fn test_taxi_airport_fee_lga() {
        assert_eq!(
            classify_taxi(Some(1.0), Some(1.75)),
            AirportTrip::Airport(Airport::Lga)
        );
        assert_eq!(classify_taxi(None, Some(1.75)), AirportTrip::Airport(Airport::Lga));
    }

    #[test]
    fn test_taxi_not_airport() {
        assert_eq!(classify_taxi(Some(1.0), Some(0.0)), AirportTrip::NotAirport);
        assert_eq!(classify_taxi(Some(1.0), None), AirportTrip::NotAirport);
        assert_eq!(classify_taxi(None, None), AirportTrip::NotAirport);
    }

    #[test]
    fn test_ride_hail_dropoff_near_jfk() {
        let near_jfk = LatLon(40.6500, -73.7900);
        assert_eq!(
            classify_ride_hail(MIDTOWN, near_jfk),
            AirportTrip::Airport(Airport::Jfk)
        );
    }

    #[test]
    fn test_ride_hail_pickup_checked_before_dropoff() {
        let at_lga = Airport::Lga.location();
        let at_ewr = Airport::Ewr.location();
        assert_eq!(
            classify_ride_hail(at_ewr, at_lga),
            AirportTrip::Airport(Airport::Ewr)
        );
    }

    #[test]
    fn test_ride_hail_far_from_all_airports() {
        let bronx = LatLon(40.8448, -73.8648);
        assert_eq!(classify_ride_hail(MIDTOWN, bronx), AirportTrip::NotAirport);
    }

    #[test]
    fn test_labels() {
        assert_eq!(AirportTrip::NotAirport.label(), "none");
        assert_eq!(AirportTrip::Airport(Airport::Lga).to_string(), "LGA");
    }
}
