//! # Terminal presence
//!
//! Estimates how many passengers of a set of flights are inside the airport
//! terminal over time.
//!
//! - [`lognormal`]: normal and log-normal CDFs
//! - [`curves`]: arrival dissipation and departure accumulation models
//! - [`series`]: per-flight 5-minute series
//! - [`grid`]: shared time axis with one column per flight plus a total
//! - [`io`]: flights CSV ingest, series and grid CSV export
//! - [`chart`]: stacked area rendering of a grid

pub mod chart;
pub mod config;
pub mod curves;
pub mod error;
pub mod flight;
pub mod grid;
pub mod io;
pub mod logging;
pub mod lognormal;
pub mod series;
pub mod time;

pub use config::ModelConfig;
pub use curves::{arrival_dissipation, departure_accumulation, PresenceCurve};
pub use error::{PresenceError, Result};
pub use flight::{Flight, FlightType};
pub use grid::{aggregate_grid, PassengerGrid, PassengerGridRow};
pub use lognormal::{lognorm_cdf, normal_cdf};
pub use series::{flight_series, series_for_flights, PassengerTimePoint};
