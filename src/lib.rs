//! # Sunwall Library
//!
//! Time-to-appearance engine for dynamic wallpapers.
//!
//! Given a wallpaper description (an ordered list of images, each tied to a time
//! of day, a named solar event or a sun position) the engine answers one
//! question on every tick: which two images should be on screen right now and
//! how far the cross-fade between them has progressed.
//!
//! ## Architecture
//!
//! - **Geographic**: `geo` computes the sun's position and samples the day's
//!   solar events (midnight, dawn, sunrise, golden hours, noon, sunset, dusk)
//! - **Schedules**: `schedule` parses wallpaper descriptions and holds the cyclic
//!   knot sequences with their bracket lookup
//! - **Engine**: `engine` builds fixed or solar models, decides when they are
//!   stale and drives them through the `WallpaperEngine` controller
//! - **Configuration**: `config` for TOML-based thresholds and tick cadence
//! - **Infrastructure**: logging, constants, error kinds and time sources
//!
//! Image loading, rendering, package formats and geolocation lookup belong to
//! the host application.

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod geo;
pub mod schedule;
pub mod time_source;

pub use config::Config;
pub use engine::{EngineState, Layers, TimeModel, WallpaperEngine};
pub use error::EngineError;
pub use geo::{Coordinate, SolarEvent, SolarPath, SolarPathSampler, SolarPosition};
pub use schedule::{ImageRef, KnotSequence, KnotTime, ScheduleKind, WallpaperDescription};
pub use time_source::{RealTimeSource, SimulatedTimeSource, TimeSource};
