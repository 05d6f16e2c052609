//! Configuration system for sunwall.
//!
//! The engine reads an optional `sunwall.toml`. Every field may be omitted, in
//! which case the matching `DEFAULT_*` constant applies:
//!
//! ```toml
//! #[Solar thresholds]
//! horizon_elevation = 0.0       # Sunrise/sunset elevation (-18..30) degrees
//! golden_hour_elevation = 6.0   # Golden hour boundary (-18..30) degrees
//! twilight_elevation = -6.0     # Dawn/dusk boundary (-18..30) degrees
//!
//! #[Sampling]
//! sample_interval = 10          # Coarse solar path sampling step (1-120) minutes
//!
//! #[Host]
//! update_interval = 60          # Suggested tick period (1-3600) seconds
//! ```
//!
//! Thresholds must keep the order `twilight < horizon < golden_hour`.
//!
//! ## Configuration Sources
//!
//! 1. A path handed to [`load_from_path`]
//! 2. **XDG_CONFIG_HOME**/sunwall/sunwall.toml via [`load`]
//! 3. Built-in defaults when no file exists

pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::constants::*;

pub use loading::{get_config_path, load, load_from_path};

/// Engine configuration.
///
/// Fields are optional so that partial files stay valid; the accessor methods
/// return the effective value. Accessors clamp into the validation ranges, so a
/// `Config` built in code without [`validation::validate_config`] still yields
/// usable values.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Elevation used for sunrise and sunset, in degrees.
    pub horizon_elevation: Option<f64>,
    /// Elevation bounding the golden hours, in degrees.
    pub golden_hour_elevation: Option<f64>,
    /// Elevation used for dawn and dusk, in degrees.
    pub twilight_elevation: Option<f64>,
    /// Coarse sampling step in minutes.
    pub sample_interval: Option<u64>,
    /// Suggested tick period in seconds.
    pub update_interval: Option<u64>,
}

impl Config {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).context("Failed to parse configuration as TOML")?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    pub fn horizon_elevation(&self) -> f64 {
        effective_elevation(self.horizon_elevation, DEFAULT_HORIZON_ELEVATION)
    }

    pub fn golden_hour_elevation(&self) -> f64 {
        effective_elevation(self.golden_hour_elevation, DEFAULT_GOLDEN_HOUR_ELEVATION)
    }

    pub fn twilight_elevation(&self) -> f64 {
        effective_elevation(self.twilight_elevation, DEFAULT_TWILIGHT_ELEVATION)
    }

    /// Coarse sampling step in minutes.
    pub fn sample_interval(&self) -> u64 {
        self.sample_interval
            .unwrap_or(DEFAULT_SAMPLE_INTERVAL)
            .clamp(MINIMUM_SAMPLE_INTERVAL, MAXIMUM_SAMPLE_INTERVAL)
    }

    /// Coarse sampling step in seconds.
    pub fn sample_interval_secs(&self) -> f64 {
        self.sample_interval().saturating_mul(60) as f64
    }

    pub fn update_interval(&self) -> std::time::Duration {
        let secs = self
            .update_interval
            .unwrap_or(DEFAULT_UPDATE_INTERVAL)
            .clamp(MINIMUM_UPDATE_INTERVAL, MAXIMUM_UPDATE_INTERVAL);
        std::time::Duration::from_secs(secs)
    }

    /// Log the effective configuration.
    pub fn log_config(&self) {
        log_block_start!("Engine configuration");
        log_indented!("Horizon elevation: {:.2}°", self.horizon_elevation());
        log_indented!("Golden hour elevation: {:.2}°", self.golden_hour_elevation());
        log_indented!("Twilight elevation: {:.2}°", self.twilight_elevation());
        log_indented!("Sample interval: {} minutes", self.sample_interval());
        log_indented!("Update interval: {} seconds", self.update_interval().as_secs());
    }
}

fn effective_elevation(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(value) if value.is_finite() => {
            value.clamp(MINIMUM_THRESHOLD_ELEVATION, MAXIMUM_THRESHOLD_ELEVATION)
        }
        _ => default,
    }
}
