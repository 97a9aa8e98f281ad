use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::ModelConfig;
use crate::curves::{ArrivalCurve, DepartureCurve, PresenceCurve};
use crate::error::PresenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlightType {
    Arrival,
    Departure,
}

impl FlightType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlightType::Arrival => "arrival",
            FlightType::Departure => "departure",
        }
    }
}

impl fmt::Display for FlightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlightType {
    type Err = PresenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "arrival" | "arr" => Ok(FlightType::Arrival),
            "departure" | "dep" => Ok(FlightType::Departure),
            _ => Err(PresenceError::UnknownFlightType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flight {
    pub id: String,
    pub flight_type: FlightType,
    pub scheduled: Option<DateTime<Utc>>,
    pub actual: Option<DateTime<Utc>>,
    pub estimated_passengers: Option<u32>,
}

impl Flight {
    pub fn new(id: impl Into<String>, flight_type: FlightType) -> Self {
        Self {
            id: id.into(),
            flight_type,
            scheduled: None,
            actual: None,
            estimated_passengers: None,
        }
    }

    pub fn scheduled_at(mut self, at: DateTime<Utc>) -> Self {
        self.scheduled = Some(at);
        self
    }

    pub fn actual_at(mut self, at: DateTime<Utc>) -> Self {
        self.actual = Some(at);
        self
    }

    pub fn with_passengers(mut self, passengers: u32) -> Self {
        self.estimated_passengers = Some(passengers);
        self
    }

    /// Actual time when known, otherwise the scheduled time, as epoch seconds.
    pub fn anchor(&self) -> Option<i64> {
        self.actual.or(self.scheduled).map(|at| at.timestamp())
    }

    pub fn passengers(&self, config: &ModelConfig) -> u32 {
        self.estimated_passengers.unwrap_or(config.default_passengers)
    }

    /// Presence curve for this flight, or `None` without an anchor time.
    pub fn curve(&self, config: &ModelConfig) -> Option<Box<dyn PresenceCurve>> {
        let anchor = self.anchor()?;
        let passengers = self.passengers(config);
        let curve: Box<dyn PresenceCurve> = match self.flight_type {
            FlightType::Arrival => Box::new(ArrivalCurve::new(anchor, passengers, config)),
            FlightType::Departure => Box::new(DepartureCurve::new(anchor, passengers, config)),
        };
        Some(curve)
    }
}

/// Keeps the flights whose id is in `ids`, in input order. Every requested
/// id that matches no flight is returned as well.
pub fn select_flights<'a>(flights: Vec<Flight>, ids: &'a [String]) -> (Vec<Flight>, Vec<&'a str>) {
    let missing = ids
        .iter()
        .filter(|id| !flights.iter().any(|flight| &flight.id == *id))
        .map(String::as_str)
        .collect();
    let selected = flights
        .into_iter()
        .filter(|flight| ids.contains(&flight.id))
        .collect();
    (selected, missing)
}
