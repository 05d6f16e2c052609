//! Error kinds surfaced by model builds and evaluations.

use chrono::NaiveDate;
use std::fmt;

/// Errors reported by the time-to-appearance engine.
///
/// A model or engine that enters an error state keeps reporting the same
/// error until it is rebuilt with new inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// The wallpaper description produced no usable knot.
    InvalidDescription { reason: String },
    /// Sunrise or sunset does not happen on this date at this location.
    NearPoleDegeneracy {
        latitude: f64,
        longitude: f64,
        date: NaiveDate,
    },
    /// Latitude or longitude is outside of its valid range.
    InvalidCoordinate { latitude: f64, longitude: f64 },
    /// A solar schedule was requested without a location.
    MissingCoordinate,
}

impl EngineError {
    pub(crate) fn invalid_description(reason: impl Into<String>) -> Self {
        EngineError::InvalidDescription {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidDescription { reason } => {
                write!(f, "Invalid wallpaper description: {reason}")
            }
            EngineError::NearPoleDegeneracy {
                latitude,
                longitude,
                date,
            } => write!(
                f,
                "The sun does not rise or set at {latitude:.4}°, {longitude:.4}° on {date}; \
                 this location is too close to a pole for a solar schedule"
            ),
            EngineError::InvalidCoordinate {
                latitude,
                longitude,
            } => write!(
                f,
                "Invalid coordinate {latitude}°, {longitude}° \
                 (latitude must be within -90..=90, longitude within -180..=180)"
            ),
            EngineError::MissingCoordinate => {
                write!(f, "A solar schedule requires a geographic location")
            }
        }
    }
}

impl std::error::Error for EngineError {}
