//! CSV ingest of flights and CSV export of series and grids.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use csv::{Reader, Writer};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use tracing::warn;

use crate::error::{PresenceError, Result};
use crate::flight::{Flight, FlightType};
use crate::grid::PassengerGrid;
use crate::series::PassengerTimePoint;

#[derive(Debug, Deserialize)]
struct FlightRecord {
    id: String,
    #[serde(rename = "type")]
    flight_type: String,
    scheduled: Option<String>,
    actual: Option<String>,
    estimated_passengers: Option<u32>,
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// RFC 3339, or a naive `YYYY-MM-DD HH:MM[:SS]` taken as UTC.
fn parse_timestamp(flight: &str, value: Option<String>) -> Result<Option<DateTime<Utc>>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(Some(at.with_timezone(&Utc)));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|naive| Some(Utc.from_utc_datetime(&naive)))
        .ok_or_else(|| PresenceError::InvalidTimestamp {
            flight: flight.to_string(),
            value: trimmed.to_string(),
        })
}

impl FlightRecord {
    /// `Ok(None)` for a row whose type is neither arrival nor departure.
    fn into_flight(self) -> Result<Option<Flight>> {
        let flight_type = match self.flight_type.parse::<FlightType>() {
            Ok(flight_type) => flight_type,
            Err(err) => {
                warn!(flight = %self.id, "skipping row: {}", err);
                return Ok(None);
            }
        };
        Ok(Some(Flight {
            scheduled: parse_timestamp(&self.id, self.scheduled)?,
            actual: parse_timestamp(&self.id, self.actual)?,
            estimated_passengers: self.estimated_passengers,
            id: self.id,
            flight_type,
        }))
    }
}

/// Reads flights from CSV with header `id,type,scheduled,actual,estimated_passengers`.
pub fn read_flights<R: Read>(reader: R) -> Result<Vec<Flight>> {
    read_flights_with_progress(reader, &ProgressBar::hidden())
}

fn read_flights_with_progress<R: Read>(reader: R, pb: &ProgressBar) -> Result<Vec<Flight>> {
    let mut rdr = Reader::from_reader(reader);
    let mut flights = Vec::new();
    for result in pb.wrap_iter(rdr.deserialize::<FlightRecord>()) {
        if let Some(flight) = result?.into_flight()? {
            flights.push(flight);
        }
    }
    Ok(flights)
}

/// Loads a flights CSV from disk with a progress bar on stderr.
pub fn load_flights(path: impl AsRef<Path>) -> Result<Vec<Flight>> {
    let path = path.as_ref();

    // First pass only counts rows for the progress bar.
    let total_records = Reader::from_reader(File::open(path)?).records().count();

    let pb = ProgressBar::new(total_records as u64);
    pb.set_message("Reading flights...");
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} {wide_bar} {pos}/{len} ({eta})")
            .progress_chars("█▒░"),
    );

    let flights = read_flights_with_progress(File::open(path)?, &pb)?;
    pb.finish_with_message("Flights loaded.");
    Ok(flights)
}

pub fn write_series<W: Write>(writer: W, points: &[PassengerTimePoint]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    // serialize() would skip the header for an empty series
    wtr.write_record(["flight_id", "type", "time", "label", "passengers"])?;
    for point in points {
        wtr.write_record([
            point.flight_id.clone(),
            point.flight_type.to_string(),
            point.time.to_string(),
            point.label.clone(),
            point.passengers.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// `time,label,<one column per flight>,total`
pub fn write_grid<W: Write>(writer: W, grid: &PassengerGrid) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    let mut header = vec!["time".to_string(), "label".to_string()];
    header.extend(grid.flight_ids.iter().cloned());
    header.push("total".to_string());
    wtr.write_record(&header)?;

    for row in &grid.rows {
        let mut record = Vec::with_capacity(row.counts.len() + 3);
        record.push(row.time.to_string());
        record.push(row.label.clone());
        record.extend(row.counts.iter().map(|count| count.to_string()));
        record.push(row.total.to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}
