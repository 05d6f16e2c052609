//! Time-to-appearance models and the controller that keeps one up to date.
//!
//! ## Module Structure
//!
//! - [`fixed`]: knots at literal times of day, valid forever once built
//! - [`solar`]: knots at today's solar events, rebuilt every local day
//! - [`controller`]: [`WallpaperEngine`], which owns the inputs, rebuilds the
//!   model when it is stale and remembers the last good result
//!
//! A [`TimeModel`] is built wholesale from a description and never patched.
//! Evaluating a built model cannot fail; every failure surfaces while building.

pub mod controller;
pub mod fixed;
pub mod solar;

use chrono::{DateTime, FixedOffset};

use crate::config::Config;
use crate::error::EngineError;
use crate::geo::Coordinate;
use crate::schedule::{KnotSequence, ScheduleKind, WallpaperDescription};

pub use crate::schedule::Layers;
pub use controller::{EngineState, WallpaperEngine};
pub use fixed::FixedSchedule;
pub use solar::SolarSchedule;

/// A built schedule of either kind.
#[derive(Debug, Clone, PartialEq)]
pub enum TimeModel {
    Fixed(FixedSchedule),
    Solar(SolarSchedule),
}

impl TimeModel {
    /// Build the model matching the description's schedule kind.
    ///
    /// `coordinate` is only used by solar schedules, and `now` selects the day a
    /// solar schedule is built for.
    pub fn build(
        description: &WallpaperDescription,
        coordinate: Option<Coordinate>,
        now: DateTime<FixedOffset>,
        config: &Config,
    ) -> Result<Self, EngineError> {
        match description.kind {
            ScheduleKind::Fixed => FixedSchedule::build(description).map(TimeModel::Fixed),
            ScheduleKind::Solar => {
                SolarSchedule::build(description, coordinate, now, config).map(TimeModel::Solar)
            }
        }
    }

    pub fn kind(&self) -> ScheduleKind {
        match self {
            TimeModel::Fixed(_) => ScheduleKind::Fixed,
            TimeModel::Solar(_) => ScheduleKind::Solar,
        }
    }

    /// Whether the model must be rebuilt before evaluating `now`.
    pub fn is_expired(&self, now: DateTime<FixedOffset>, coordinate: Option<Coordinate>) -> bool {
        match self {
            TimeModel::Fixed(model) => model.is_expired(),
            TimeModel::Solar(model) => model.is_expired(now, coordinate),
        }
    }

    pub fn phase_at(&self, instant: DateTime<FixedOffset>) -> f64 {
        match self {
            TimeModel::Fixed(model) => model.phase_at(instant),
            TimeModel::Solar(model) => model.phase_at(instant),
        }
    }

    pub fn evaluate(&self, instant: DateTime<FixedOffset>) -> Layers {
        match self {
            TimeModel::Fixed(model) => model.evaluate(instant),
            TimeModel::Solar(model) => model.evaluate(instant),
        }
    }

    /// When the model goes stale on its own, `None` if it never does.
    pub fn next_expiry(&self) -> Option<DateTime<FixedOffset>> {
        match self {
            TimeModel::Fixed(_) => None,
            TimeModel::Solar(model) => model.next_expiry(),
        }
    }

    pub fn knots(&self) -> &KnotSequence {
        match self {
            TimeModel::Fixed(model) => model.knots(),
            TimeModel::Solar(model) => model.knots(),
        }
    }
}
