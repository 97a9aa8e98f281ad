use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::config::ModelConfig;
use crate::curves::{round_passengers, PresenceCurve};
use crate::flight::{Flight, FlightType};
use crate::time::{ceil_to_step, format_label, steps};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassengerTimePoint {
    pub flight_id: String,
    #[serde(rename = "type")]
    pub flight_type: FlightType,
    /// Unix epoch seconds.
    pub time: i64,
    pub label: String,
    pub passengers: u32,
}

/// Sampled presence curve for one flight, every `step_minutes` across its
/// window.
///
/// Arrivals start at the first step boundary at or after landing. Departures
/// start at the (hour aligned) terminal opening and always end with a point
/// exactly at the departure instant carrying the full cohort.
///
/// A flight with neither an actual nor a scheduled time yields no points.
pub fn flight_series(flight: &Flight, config: &ModelConfig) -> Vec<PassengerTimePoint> {
    let Some(curve) = flight.curve(config) else {
        debug!(flight = %flight.id, "no scheduled or actual time, skipping series");
        return Vec::new();
    };

    let step = config.step_seconds();
    let (window_start, window_end) = curve.window();
    let first = match flight.flight_type {
        FlightType::Arrival => ceil_to_step(window_start, step),
        FlightType::Departure => window_start,
    };

    let point = |t: i64, passengers: u32| PassengerTimePoint {
        flight_id: flight.id.clone(),
        flight_type: flight.flight_type,
        time: t,
        label: format_label(t),
        passengers,
    };

    let mut points: Vec<PassengerTimePoint> = steps(first, window_end, step)
        .map(|t| point(t, round_passengers(curve.passengers_at(t), curve.passengers())))
        .collect();

    if flight.flight_type == FlightType::Departure
        && points.last().map(|p| p.time) != Some(window_end)
    {
        points.push(point(window_end, curve.passengers()));
    }

    points
}

/// Series for every flight, concatenated in input order.
pub fn series_for_flights(flights: &[Flight], config: &ModelConfig) -> Vec<PassengerTimePoint> {
    flights
        .par_iter()
        .map(|flight| flight_series(flight, config))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(hour: u32, minute: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_departure_series_from_zero_to_full() {
        let flight = Flight::new("QF1", FlightType::Departure)
            .scheduled_at(at(11, 0))
            .with_passengers(150);
        let points = flight_series(&flight, &ModelConfig::default());

        let first = points.first().unwrap();
        let last = points.last().unwrap();
        assert_eq!(first.label, "08:00");
        assert_eq!(first.passengers, 0);
        assert_eq!(last.time, at(11, 0).timestamp());
        assert_eq!(last.passengers, 150);
        // 08:00 through 11:00 inclusive
        assert_eq!(points.len(), 37);
    }

    #[test]
    fn test_departure_off_grid_gets_final_point() {
        let departure = at(11, 0).timestamp() + 130;
        let flight = Flight::new("QF2", FlightType::Departure)
            .scheduled_at(Utc.timestamp_opt(departure, 0).unwrap())
            .with_passengers(90);
        let points = flight_series(&flight, &ModelConfig::default());

        let last = points.last().unwrap();
        assert_eq!(last.time, departure);
        assert_eq!(last.passengers, 90);
        let before_last = &points[points.len() - 2];
        assert_eq!(before_last.time, at(11, 0).timestamp());
        assert!(before_last.passengers < 90);
    }

    #[test]
    fn test_arrival_series_from_full_to_zero() {
        let flight = Flight::new("EK5", FlightType::Arrival)
            .scheduled_at(at(10, 0))
            .with_passengers(80);
        let points = flight_series(&flight, &ModelConfig::default());

        assert_eq!(points.first().unwrap().passengers, 80);
        assert_eq!(points.first().unwrap().label, "10:00");
        assert_eq!(points.last().unwrap().label, "11:30");
        assert_eq!(points.last().unwrap().passengers, 0);
        assert_eq!(points.len(), 19);
    }

    #[test]
    fn test_arrival_starts_on_next_step() {
        let flight = Flight::new("EK6", FlightType::Arrival)
            .scheduled_at(at(10, 0))
            .actual_at(at(10, 2))
            .with_passengers(80);
        let points = flight_series(&flight, &ModelConfig::default());
        assert_eq!(points.first().unwrap().label, "10:05");
        assert_eq!(points.last().unwrap().label, "11:30");
    }

    #[test]
    fn test_series_monotonic() {
        let config = ModelConfig::default();
        let departure = Flight::new("D", FlightType::Departure)
            .scheduled_at(at(18, 45))
            .with_passengers(213);
        let arrival = Flight::new("A", FlightType::Arrival)
            .scheduled_at(at(6, 10))
            .with_passengers(187);

        let dep = flight_series(&departure, &config);
        assert!(dep.windows(2).all(|w| w[0].passengers <= w[1].passengers + 1));
        let arr = flight_series(&arrival, &config);
        assert!(arr.windows(2).all(|w| w[0].passengers + 1 >= w[1].passengers));
    }

    #[test]
    fn test_missing_times_yield_nothing() {
        let flight = Flight::new("XX", FlightType::Arrival).with_passengers(10);
        assert!(flight_series(&flight, &ModelConfig::default()).is_empty());
    }

    #[test]
    fn test_series_for_flights_keeps_input_order() {
        let flights = vec![
            Flight::new("B", FlightType::Arrival).scheduled_at(at(12, 0)),
            Flight::new("none", FlightType::Arrival),
            Flight::new("A", FlightType::Departure).scheduled_at(at(9, 0)),
        ];
        let points = series_for_flights(&flights, &ModelConfig::default());
        let split = points.iter().position(|p| p.flight_id == "A").unwrap();
        assert!(points[..split].iter().all(|p| p.flight_id == "B"));
        assert!(points[split..].iter().all(|p| p.flight_id == "A"));
        assert_eq!(points[0].passengers, 100);
    }
}
