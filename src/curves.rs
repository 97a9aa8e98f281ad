//! Presence curves: how many passengers of one flight are in the terminal
//! at a given instant.
//!
//! Departures accumulate from 0 to `N` between terminal opening and
//! departure; arrivals dissipate from `N` to 0 between landing and the exit
//! deadline. Both shapes come from a log-normal CDF over the elapsed
//! fraction of the window, normalised so the curve hits its boundary value
//! exactly at the window end.

use crate::config::ModelConfig;
use crate::lognormal::lognorm_cdf;
use crate::time::floor_to_hour;

/// Log-normal CDF at `fraction`, rescaled so that `fraction = 1` maps to 1.
fn normalized_cdf(fraction: f64, sigma: f64, median_fraction: f64) -> f64 {
    let at_end = lognorm_cdf(1.0, sigma, median_fraction);
    if at_end <= 0.0 {
        return 0.0;
    }
    (lognorm_cdf(fraction, sigma, median_fraction) / at_end).min(1.0)
}

/// Passengers of an arrived cohort still in the terminal at `t`.
pub fn arrival_dissipation(
    t: i64,
    passengers: f64,
    t_land: i64,
    t_end: i64,
    sigma: f64,
    median_fraction: f64,
) -> f64 {
    if t <= t_land {
        return passengers;
    }
    if t >= t_end {
        return 0.0;
    }
    let fraction = (t - t_land) as f64 / (t_end - t_land) as f64;
    passengers * (1.0 - normalized_cdf(fraction, sigma, median_fraction))
}

/// Passengers of a departing cohort already in the terminal at `t`.
pub fn departure_accumulation(
    t: i64,
    passengers: f64,
    t_open: i64,
    t_dep: i64,
    sigma: f64,
    median_fraction: f64,
) -> f64 {
    if t <= t_open {
        return 0.0;
    }
    if t >= t_dep {
        return passengers;
    }
    let fraction = (t - t_open) as f64 / (t_dep - t_open) as f64;
    passengers * normalized_cdf(fraction, sigma, median_fraction)
}

/// Rounds a curve value to a whole passenger count within `[0, max]`.
pub fn round_passengers(value: f64, max: u32) -> u32 {
    value.round().clamp(0.0, f64::from(max)) as u32
}

pub trait PresenceCurve: Send + Sync {
    /// Bounded interval outside which the curve saturates.
    fn window(&self) -> (i64, i64);

    /// Cohort size.
    fn passengers(&self) -> u32;

    fn passengers_at(&self, t: i64) -> f64;

    /// Value used when several flights share one time axis. Defaults to
    /// [`PresenceCurve::passengers_at`].
    fn grid_passengers_at(&self, t: i64) -> f64 {
        self.passengers_at(t)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrivalCurve {
    pub landing: i64,
    pub exit_deadline: i64,
    pub passengers: u32,
    pub sigma: f64,
    pub median_fraction: f64,
}

impl ArrivalCurve {
    pub fn new(landing: i64, passengers: u32, config: &ModelConfig) -> Self {
        Self {
            landing,
            exit_deadline: landing + config.arrival_window_seconds(),
            passengers,
            sigma: config.arrival_sigma,
            median_fraction: config.arrival_median_fraction,
        }
    }
}

impl PresenceCurve for ArrivalCurve {
    fn window(&self) -> (i64, i64) {
        (self.landing, self.exit_deadline)
    }

    fn passengers(&self) -> u32 {
        self.passengers
    }

    fn passengers_at(&self, t: i64) -> f64 {
        arrival_dissipation(
            t,
            f64::from(self.passengers),
            self.landing,
            self.exit_deadline,
            self.sigma,
            self.median_fraction,
        )
    }

    /// A flight that has not landed yet puts nobody in the terminal.
    fn grid_passengers_at(&self, t: i64) -> f64 {
        if t < self.landing {
            0.0
        } else {
            self.passengers_at(t)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartureCurve {
    pub opening: i64,
    pub departure: i64,
    pub passengers: u32,
    pub sigma: f64,
    pub median_fraction: f64,
}

impl DepartureCurve {
    /// Opens `departure_lead_minutes` before departure, snapped down to the
    /// hour.
    pub fn new(departure: i64, passengers: u32, config: &ModelConfig) -> Self {
        Self {
            opening: floor_to_hour(departure - config.departure_lead_seconds()),
            departure,
            passengers,
            sigma: config.departure_sigma,
            median_fraction: config.departure_median_fraction,
        }
    }
}

impl PresenceCurve for DepartureCurve {
    fn window(&self) -> (i64, i64) {
        (self.opening, self.departure)
    }

    fn passengers(&self) -> u32 {
        self.passengers
    }

    fn passengers_at(&self, t: i64) -> f64 {
        departure_accumulation(
            t,
            f64::from(self.passengers),
            self.opening,
            self.departure,
            self.sigma,
            self.median_fraction,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: i64 = 1_714_557_600;
    const WINDOW: i64 = 90 * 60;

    #[test]
    fn test_arrival_boundaries() {
        for n in [0.0, 1.0, 80.0, 350.0] {
            assert_eq!(arrival_dissipation(T, n, T, T + WINDOW, 0.3, 0.3), n);
            assert_eq!(arrival_dissipation(T - 60, n, T, T + WINDOW, 0.3, 0.3), n);
            assert_eq!(arrival_dissipation(T + WINDOW, n, T, T + WINDOW, 0.3, 0.3), 0.0);
            assert_eq!(arrival_dissipation(T + 2 * WINDOW, n, T, T + WINDOW, 0.3, 0.3), 0.0);
        }
    }

    #[test]
    fn test_departure_boundaries() {
        let open = T - 3 * 3600;
        for n in [0.0, 1.0, 150.0, 400.0] {
            assert_eq!(departure_accumulation(open, n, open, T, 0.5, 0.7), 0.0);
            assert_eq!(departure_accumulation(open - 600, n, open, T, 0.5, 0.7), 0.0);
            assert_eq!(departure_accumulation(T, n, open, T, 0.5, 0.7), n);
            assert_eq!(departure_accumulation(T + 600, n, open, T, 0.5, 0.7), n);
        }
    }

    #[test]
    fn test_arrival_non_increasing() {
        let mut previous = f64::INFINITY;
        for t in (T..=T + WINDOW).step_by(60) {
            let value = arrival_dissipation(t, 200.0, T, T + WINDOW, 0.3, 0.3);
            assert!(value <= previous + 1e-9, "increase at {t}");
            assert!((0.0..=200.0).contains(&value));
            previous = value;
        }
    }

    #[test]
    fn test_departure_non_decreasing() {
        let open = T - 3 * 3600;
        let mut previous = 0.0;
        for t in (open..=T).step_by(60) {
            let value = departure_accumulation(t, 200.0, open, T, 0.5, 0.7);
            assert!(value + 1e-9 >= previous, "decrease at {t}");
            assert!((0.0..=200.0).contains(&value));
            previous = value;
        }
    }

    #[test]
    fn test_half_cohort_at_median() {
        // Median fraction 0.3 of a 90 minute window is 27 minutes.
        let value = arrival_dissipation(T + 27 * 60, 100.0, T, T + WINDOW, 0.3, 0.3);
        let expected = 100.0 * (1.0 - 0.5 / lognorm_cdf(1.0, 0.3, 0.3));
        assert!((value - expected).abs() < 1e-6);
        assert!(value > 45.0 && value < 50.0);
    }

    #[test]
    fn test_departure_opening_snaps_to_hour() {
        let config = ModelConfig::default();
        let curve = DepartureCurve::new(T + 40 * 60, 60, &config);
        assert_eq!(curve.opening, T - 3 * 3600);
        assert_eq!(curve.window(), (T - 3 * 3600, T + 40 * 60));
    }

    #[test]
    fn test_arrival_grid_value_before_landing() {
        let curve = ArrivalCurve::new(T, 50, &ModelConfig::default());
        assert_eq!(curve.passengers_at(T - 300), 50.0);
        assert_eq!(curve.grid_passengers_at(T - 300), 0.0);
        assert_eq!(curve.grid_passengers_at(T), 50.0);
    }

    #[test]
    fn test_round_passengers_clamps() {
        assert_eq!(round_passengers(49.5, 50), 50);
        assert_eq!(round_passengers(50.4, 50), 50);
        assert_eq!(round_passengers(-0.2, 50), 0);
        assert_eq!(round_passengers(12.49, 50), 12);
    }
}
