//! Model constants for the presence curves and the aggregation grid.
//!
//! Every field has a default, so a TOML file only needs the values it
//! overrides:
//!
//! ```toml
//! arrival_window_minutes = 120
//! departure_sigma = 0.4
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{PresenceError, Result};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Sampling step for series and grid rows.
    pub step_minutes: u32,
    /// Time from landing until the whole cohort has left the terminal.
    pub arrival_window_minutes: u32,
    pub arrival_sigma: f64,
    /// Fraction of the arrival window at which half the cohort has left.
    pub arrival_median_fraction: f64,
    /// How long before departure passengers start showing up. The window
    /// start is snapped down to the hour.
    pub departure_lead_minutes: u32,
    pub departure_sigma: f64,
    /// Fraction of the departure window at which half the cohort is in.
    pub departure_median_fraction: f64,
    /// Trailing padding after the latest window end in the grid.
    pub grid_buffer_minutes: u32,
    /// Used when a flight carries no passenger estimate.
    pub default_passengers: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            step_minutes: 5,
            arrival_window_minutes: 90,
            arrival_sigma: 0.3,
            arrival_median_fraction: 0.3,
            departure_lead_minutes: 180,
            departure_sigma: 0.5,
            departure_median_fraction: 0.7,
            grid_buffer_minutes: 120,
            default_passengers: 100,
        }
    }
}

impl ModelConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ModelConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        let positive_minutes = [
            ("step_minutes", self.step_minutes),
            ("arrival_window_minutes", self.arrival_window_minutes),
            ("departure_lead_minutes", self.departure_lead_minutes),
        ];
        for (name, value) in positive_minutes {
            if value == 0 {
                return Err(PresenceError::InvalidConfig(format!(
                    "{name} must be greater than zero"
                )));
            }
        }

        for (name, sigma) in [
            ("arrival_sigma", self.arrival_sigma),
            ("departure_sigma", self.departure_sigma),
        ] {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(PresenceError::InvalidConfig(format!(
                    "{name} must be a positive number, got {sigma}"
                )));
            }
        }

        for (name, fraction) in [
            ("arrival_median_fraction", self.arrival_median_fraction),
            ("departure_median_fraction", self.departure_median_fraction),
        ] {
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(PresenceError::InvalidConfig(format!(
                    "{name} must be in (0, 1], got {fraction}"
                )));
            }
        }

        Ok(())
    }

    pub fn step_seconds(&self) -> i64 {
        i64::from(self.step_minutes) * 60
    }

    pub fn arrival_window_seconds(&self) -> i64 {
        i64::from(self.arrival_window_minutes) * 60
    }

    pub fn departure_lead_seconds(&self) -> i64 {
        i64::from(self.departure_lead_minutes) * 60
    }

    pub fn grid_buffer_seconds(&self) -> i64 {
        i64::from(self.grid_buffer_minutes) * 60
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ModelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.step_seconds(), 300);
        assert_eq!(config.arrival_window_seconds(), 90 * 60);
        assert_eq!(config.grid_buffer_seconds(), 2 * 3600);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ModelConfig::from_toml_str("arrival_window_minutes = 120\n").unwrap();
        assert_eq!(config.arrival_window_minutes, 120);
        assert_eq!(config.departure_lead_minutes, 180);
        assert_eq!(config.default_passengers, 100);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = ModelConfig::from_toml_str("").unwrap();
        assert_eq!(config, ModelConfig::default());
    }

    #[test]
    fn test_rejects_zero_step() {
        let err = ModelConfig::from_toml_str("step_minutes = 0").unwrap_err();
        assert!(matches!(err, PresenceError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_bad_sigma_and_median() {
        assert!(ModelConfig::from_toml_str("arrival_sigma = -0.1").is_err());
        assert!(ModelConfig::from_toml_str("departure_median_fraction = 1.5").is_err());
        assert!(ModelConfig::from_toml_str("arrival_median_fraction = 0.0").is_err());
    }

    #[test]
    fn test_rejects_unknown_keys() {
        let err = ModelConfig::from_toml_str("window = 3").unwrap_err();
        assert!(matches!(err, PresenceError::ConfigParse(_)));
    }
}
