//! Geographic location and solar geometry.
//!
//! ## Module Structure
//!
//! - [`position`]: elevation/azimuth of the sun for an instant and a coordinate
//! - [`path`]: the day's characteristic solar events (midnight, dawn, sunrise,
//!   golden hours, noon, sunset, dusk) found by sampling and bisection
//!
//! Both are pure computations. Polar regions are handled by reporting the
//! events that do not happen on a given day as absent.

pub mod path;
pub mod position;

use serde::{Deserialize, Serialize};

use crate::constants::{MAXIMUM_LATITUDE, MAXIMUM_LONGITUDE, MINIMUM_LATITUDE, MINIMUM_LONGITUDE};
use crate::error::EngineError;

pub use path::{CrossingDirection, SolarEvent, SolarPath, SolarPathSampler};
pub use position::SolarPosition;

#[cfg(test)]
mod tests;

/// A validated geographic coordinate in decimal degrees.
///
/// Only obtainable through [`Coordinate::new`]; deserialized values go through
/// the same range check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = EngineError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside of the valid ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, EngineError> {
        let valid = (MINIMUM_LATITUDE..=MAXIMUM_LATITUDE).contains(&latitude)
            && (MINIMUM_LONGITUDE..=MAXIMUM_LONGITUDE).contains(&longitude);
        if !valid {
            return Err(EngineError::InvalidCoordinate {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        write!(
            f,
            "{:.4}°{ns}, {:.4}°{ew}",
            self.latitude.abs(),
            self.longitude.abs()
        )
    }
}
