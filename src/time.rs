//! Epoch-second arithmetic for the 5-minute grid and `HH:MM` labels.

use chrono::{DateTime, Utc};

pub const SECONDS_PER_HOUR: i64 = 3600;

/// Largest multiple of `step` that is `<= ts`.
pub fn floor_to_step(ts: i64, step: i64) -> i64 {
    ts - ts.rem_euclid(step)
}

/// Smallest multiple of `step` that is `>= ts`.
pub fn ceil_to_step(ts: i64, step: i64) -> i64 {
    let floor = floor_to_step(ts, step);
    if floor == ts {
        ts
    } else {
        floor + step
    }
}

pub fn floor_to_hour(ts: i64) -> i64 {
    floor_to_step(ts, SECONDS_PER_HOUR)
}

/// 24-hour `HH:MM` in UTC.
pub fn format_label(ts: i64) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_else(|| "--:--".to_string())
}

/// Inclusive `start..=end` walk in `step` increments.
pub fn steps(start: i64, end: i64, step: i64) -> impl Iterator<Item = i64> {
    std::iter::successors(Some(start), move |t| Some(t + step)).take_while(move |t| *t <= end)
}
