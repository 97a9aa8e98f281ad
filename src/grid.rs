use std::collections::HashMap;

use rayon::prelude::*;
use tracing::debug;

use crate::config::ModelConfig;
use crate::curves::{round_passengers, PresenceCurve};
use crate::flight::Flight;
use crate::time::{floor_to_step, format_label, steps};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassengerGridRow {
    pub time: i64,
    pub label: String,
    /// One count per flight, in [`PassengerGrid::flight_ids`] order.
    pub counts: Vec<u32>,
    /// Widened so that large cohorts cannot overflow the sum.
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassengerGrid {
    /// Column ids in input order. The second and later flights sharing an id
    /// are named `<id>#2`, `<id>#3`, ...
    pub flight_ids: Vec<String>,
    pub rows: Vec<PassengerGridRow>,
}

impl PassengerGrid {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count for `flight_id` in `row`.
    pub fn count(&self, row: &PassengerGridRow, flight_id: &str) -> Option<u32> {
        let column = self.flight_ids.iter().position(|id| id == flight_id)?;
        row.counts.get(column).copied()
    }

    pub fn row_at(&self, time: i64) -> Option<&PassengerGridRow> {
        self.rows
            .binary_search_by_key(&time, |row| row.time)
            .ok()
            .map(|index| &self.rows[index])
    }

    /// Earliest row with the highest total.
    pub fn peak(&self) -> Option<&PassengerGridRow> {
        self.rows.iter().fold(None, |best, row| match best {
            Some(current) if current.total >= row.total => Some(current),
            _ => Some(row),
        })
    }
}

pub fn row_total(counts: &[u32]) -> u64 {
    counts.iter().map(|&count| u64::from(count)).sum()
}

/// Column headers for `flights`. A repeated id gets a `#2`, `#3`, ... suffix
/// so every column stays addressable.
fn unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    ids.map(|id| {
        let occurrence = seen.entry(id).or_insert(0);
        *occurrence += 1;
        if *occurrence == 1 {
            id.to_string()
        } else {
            format!("{id}#{occurrence}")
        }
    })
    .collect()
}

/// Combines the presence curves of `flights` on one shared time axis.
///
/// The axis runs from the earliest window start (floored to the step) to the
/// latest window end plus the trailing buffer. Every cell is evaluated on the
/// curve itself at the row instant rather than interpolated from a sampled
/// series. Flights without a usable time are left out, and repeated flight
/// ids are made unique (see [`PassengerGrid::flight_ids`]).
pub fn aggregate_grid(flights: &[Flight], config: &ModelConfig) -> PassengerGrid {
    let curves: Vec<(&Flight, Box<dyn PresenceCurve>)> = flights
        .iter()
        .filter_map(|flight| match flight.curve(config) {
            Some(curve) => Some((flight, curve)),
            None => {
                debug!(flight = %flight.id, "no scheduled or actual time, left out of grid");
                None
            }
        })
        .collect();

    let Some(start) = curves.iter().map(|(_, curve)| curve.window().0).min() else {
        return PassengerGrid::default();
    };
    let Some(latest_end) = curves.iter().map(|(_, curve)| curve.window().1).max() else {
        return PassengerGrid::default();
    };

    let step = config.step_seconds();
    let start = floor_to_step(start, step);
    let end = latest_end + config.grid_buffer_seconds();
    let times: Vec<i64> = steps(start, end, step).collect();
    debug!(
        flights = curves.len(),
        rows = times.len(),
        from = %format_label(start),
        to = %format_label(end),
        "aggregating presence grid"
    );

    let columns: Vec<Vec<u32>> = curves
        .par_iter()
        .map(|(_, curve)| {
            times
                .iter()
                .map(|&t| round_passengers(curve.grid_passengers_at(t), curve.passengers()))
                .collect()
        })
        .collect();

    let rows = times
        .iter()
        .enumerate()
        .map(|(index, &time)| {
            let counts: Vec<u32> = columns.iter().map(|column| column[index]).collect();
            PassengerGridRow {
                time,
                label: format_label(time),
                total: row_total(&counts),
                counts,
            }
        })
        .collect();

    PassengerGrid {
        flight_ids: unique_ids(curves.iter().map(|(flight, _)| flight.id.as_str())),
        rows,
    }
}
