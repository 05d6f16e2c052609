//! Application-wide constants and default values.
//!
//! Defaults are used when the corresponding configuration field is absent.
//! Validation limits bound what a configuration file may request.

// # Schedule Cycle

/// Length of one fixed schedule cycle in seconds (a civil day).
pub const SECONDS_PER_DAY: f64 = 86_400.0;

// # Solar Event Thresholds (degrees of apparent solar elevation)

/// Sunrise and sunset happen when the sun crosses this elevation.
pub const DEFAULT_HORIZON_ELEVATION: f64 = 0.0;

/// Morning golden hour ends / evening golden hour starts at this elevation.
pub const DEFAULT_GOLDEN_HOUR_ELEVATION: f64 = 6.0;

/// Dawn and dusk (end of civil twilight) happen at this elevation.
pub const DEFAULT_TWILIGHT_ELEVATION: f64 = -6.0;

pub const MINIMUM_THRESHOLD_ELEVATION: f64 = -18.0;
pub const MAXIMUM_THRESHOLD_ELEVATION: f64 = 30.0;

// # Sampling

/// Coarse sampling step used when searching the solar path, in minutes.
pub const DEFAULT_SAMPLE_INTERVAL: u64 = 10;
pub const MINIMUM_SAMPLE_INTERVAL: u64 = 1;
pub const MAXIMUM_SAMPLE_INTERVAL: u64 = 120;

/// Bisection stops once the bracketing interval is shorter than this, in seconds.
pub const CROSSING_TOLERANCE_SECS: f64 = 0.5;

/// Upper bound on refinement steps for both bisection and extremum search.
pub const MAX_REFINEMENT_ITERATIONS: usize = 64;

/// Solar midnight is searched this many hours either side of noon ± 12h.
pub const MIDNIGHT_SEARCH_HALF_WIDTH_HOURS: f64 = 2.0;

// # Update Cadence

/// Suggested delay between two host ticks, in seconds.
pub const DEFAULT_UPDATE_INTERVAL: u64 = 60;
pub const MINIMUM_UPDATE_INTERVAL: u64 = 1;
pub const MAXIMUM_UPDATE_INTERVAL: u64 = 3600;

// # Geographic Limits

pub const MINIMUM_LATITUDE: f64 = -90.0;
pub const MAXIMUM_LATITUDE: f64 = 90.0;
pub const MINIMUM_LONGITUDE: f64 = -180.0;
pub const MAXIMUM_LONGITUDE: f64 = 180.0;

// # Configuration Files

pub const CONFIG_DIR_NAME: &str = "sunwall";
pub const CONFIG_FILE_NAME: &str = "sunwall.toml";
