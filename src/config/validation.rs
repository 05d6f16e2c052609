//! Configuration validation functionality.
//!
//! Rejects out-of-range values and threshold orders that would make the solar
//! events collapse into one another.

use anyhow::Result;

use super::Config;
use crate::constants::*;

/// Validate every field that is present, then the relations between thresholds.
pub fn validate_config(config: &Config) -> Result<()> {
    let thresholds = [
        ("horizon_elevation", config.horizon_elevation),
        ("golden_hour_elevation", config.golden_hour_elevation),
        ("twilight_elevation", config.twilight_elevation),
    ];
    for (name, value) in thresholds {
        if let Some(value) = value {
            validate_elevation(value, name)?;
        }
    }

    if let Some(interval) = config.sample_interval
        && !(MINIMUM_SAMPLE_INTERVAL..=MAXIMUM_SAMPLE_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "sample_interval ({} minutes) must be between {} and {} minutes",
            interval,
            MINIMUM_SAMPLE_INTERVAL,
            MAXIMUM_SAMPLE_INTERVAL
        );
    }

    if let Some(interval) = config.update_interval
        && !(MINIMUM_UPDATE_INTERVAL..=MAXIMUM_UPDATE_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "update_interval ({} seconds) must be between {} and {} seconds",
            interval,
            MINIMUM_UPDATE_INTERVAL,
            MAXIMUM_UPDATE_INTERVAL
        );
    }

    // Effective values, so a single overridden threshold is checked against the defaults
    let twilight = config.twilight_elevation();
    let horizon = config.horizon_elevation();
    let golden = config.golden_hour_elevation();

    if twilight >= horizon {
        anyhow::bail!(
            "twilight_elevation ({twilight}°) must be below horizon_elevation ({horizon}°)"
        );
    }
    if horizon >= golden {
        anyhow::bail!(
            "horizon_elevation ({horizon}°) must be below golden_hour_elevation ({golden}°)"
        );
    }

    Ok(())
}

fn validate_elevation(value: f64, field_name: &str) -> Result<()> {
    if !value.is_finite() {
        anyhow::bail!("{field_name} must be a finite number");
    }
    if !(MINIMUM_THRESHOLD_ELEVATION..=MAXIMUM_THRESHOLD_ELEVATION).contains(&value) {
        anyhow::bail!(
            "{} ({}°) must be between {}° and {}°",
            field_name,
            value,
            MINIMUM_THRESHOLD_ELEVATION,
            MAXIMUM_THRESHOLD_ELEVATION
        );
    }
    Ok(())
}
