//! Characteristic solar events of one calendar day.
//!
//! The elevation curve of a day is smooth and, between solar midnight and solar
//! noon (or noon and the next midnight), effectively monotonic. Events are found
//! by coarse sampling at a fixed step followed by refinement inside the
//! bracketing interval: bisection for threshold crossings, ternary search for
//! the extrema.
//!
//! Solar noon, solar midnight and the next solar midnight always exist. Every
//! threshold crossing may be absent near the poles (polar day or polar night),
//! in which case the field is `None`.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::{Coordinate, SolarPosition};
use crate::config::Config;
use crate::constants::{
    CROSSING_TOLERANCE_SECS, MAX_REFINEMENT_ITERATIONS, MIDNIGHT_SEARCH_HALF_WIDTH_HOURS,
};

/// Named solar events of a day, in chronological order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolarEvent {
    Midnight,
    Dawn,
    Sunrise,
    #[serde(alias = "morning_golden_hour_end")]
    MorningGoldenHour,
    #[serde(alias = "solar_noon")]
    Noon,
    #[serde(alias = "evening_golden_hour_start")]
    EveningGoldenHour,
    Sunset,
    Dusk,
}

impl SolarEvent {
    pub const ALL: [SolarEvent; 8] = [
        SolarEvent::Midnight,
        SolarEvent::Dawn,
        SolarEvent::Sunrise,
        SolarEvent::MorningGoldenHour,
        SolarEvent::Noon,
        SolarEvent::EveningGoldenHour,
        SolarEvent::Sunset,
        SolarEvent::Dusk,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            SolarEvent::Midnight => "Solar midnight",
            SolarEvent::Dawn => "Dawn",
            SolarEvent::Sunrise => "Sunrise",
            SolarEvent::MorningGoldenHour => "Morning golden hour end",
            SolarEvent::Noon => "Solar noon",
            SolarEvent::EveningGoldenHour => "Evening golden hour start",
            SolarEvent::Sunset => "Sunset",
            SolarEvent::Dusk => "Dusk",
        }
    }
}

/// Whether the sun is climbing or sinking through a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossingDirection {
    Rising,
    Falling,
}

/// The solar events of one calendar day at one location.
#[derive(Debug, Clone, PartialEq)]
pub struct SolarPath {
    /// The local calendar date this path was sampled for.
    pub date: NaiveDate,
    pub coordinate: Coordinate,
    /// Lowest point of the night preceding `solar_noon`.
    pub midnight: DateTime<FixedOffset>,
    pub dawn: Option<DateTime<FixedOffset>>,
    pub sunrise: Option<DateTime<FixedOffset>>,
    pub morning_golden_hour_end: Option<DateTime<FixedOffset>>,
    pub solar_noon: DateTime<FixedOffset>,
    pub evening_golden_hour_start: Option<DateTime<FixedOffset>>,
    pub sunset: Option<DateTime<FixedOffset>>,
    pub dusk: Option<DateTime<FixedOffset>>,
    /// Lowest point of the night following `solar_noon`.
    pub next_midnight: DateTime<FixedOffset>,
    pub noon_elevation: f64,
    pub midnight_elevation: f64,
}

impl SolarPath {
    /// Instant of a named event, `None` if it does not happen on this day.
    pub fn event(&self, event: SolarEvent) -> Option<DateTime<FixedOffset>> {
        match event {
            SolarEvent::Midnight => Some(self.midnight),
            SolarEvent::Dawn => self.dawn,
            SolarEvent::Sunrise => self.sunrise,
            SolarEvent::MorningGoldenHour => self.morning_golden_hour_end,
            SolarEvent::Noon => Some(self.solar_noon),
            SolarEvent::EveningGoldenHour => self.evening_golden_hour_start,
            SolarEvent::Sunset => self.sunset,
            SolarEvent::Dusk => self.dusk,
        }
    }

    /// Sunrise and sunset both happen; everything a solar schedule needs.
    pub fn has_sunrise_and_sunset(&self) -> bool {
        self.sunrise.is_some() && self.sunset.is_some()
    }

    /// The sun stays above the horizon the whole day.
    pub fn is_polar_day(&self) -> bool {
        self.sunrise.is_none() && self.sunset.is_none() && self.midnight_elevation > 0.0
    }

    /// The sun stays below the horizon the whole day.
    pub fn is_polar_night(&self) -> bool {
        self.sunrise.is_none() && self.sunset.is_none() && self.noon_elevation <= 0.0
    }

    /// Seconds between this solar midnight and the next one.
    pub fn cycle_length(&self) -> f64 {
        seconds_between(self.midnight, self.next_midnight)
    }

    pub fn log_events(&self) {
        log_indented!("Location: {}", self.coordinate);
        log_indented!("Date: {}", self.date);
        for event in SolarEvent::ALL {
            match self.event(event) {
                Some(at) => log_indented!("{}: {}", event.display_name(), at.format("%H:%M:%S")),
                None => log_indented!("{}: does not occur", event.display_name()),
            }
        }
    }
}

/// Samples the solar elevation curve of a location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPathSampler {
    coordinate: Coordinate,
    horizon_elevation: f64,
    golden_hour_elevation: f64,
    twilight_elevation: f64,
    step_secs: f64,
}

impl SolarPathSampler {
    pub fn new(coordinate: Coordinate, config: &Config) -> Self {
        Self {
            coordinate,
            horizon_elevation: config.horizon_elevation(),
            golden_hour_elevation: config.golden_hour_elevation(),
            twilight_elevation: config.twilight_elevation(),
            step_secs: config.sample_interval_secs(),
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn elevation_at(&self, instant: DateTime<FixedOffset>) -> f64 {
        SolarPosition::at(&instant, self.coordinate).elevation
    }

    /// Sample the solar events of `date`, a calendar day in the given UTC offset.
    pub fn sample(&self, date: NaiveDate, offset: FixedOffset) -> SolarPath {
        let day_start = local_midnight(date, offset);
        let solar_noon = self.find_extremum(day_start, day_start + Duration::days(1), true);

        let half_width = Duration::minutes((MIDNIGHT_SEARCH_HALF_WIDTH_HOURS * 60.0) as i64);
        let around = |center: DateTime<FixedOffset>| (center - half_width, center + half_width);

        let (from, to) = around(solar_noon - Duration::hours(12));
        let midnight = self.find_extremum(from, to, false);
        let (from, to) = around(solar_noon + Duration::hours(12));
        let next_midnight = self.find_extremum(from, to, false);

        let rising = |elevation| {
            self.find_crossing(midnight, solar_noon, elevation, CrossingDirection::Rising)
        };
        let falling = |elevation| {
            self.find_crossing(solar_noon, next_midnight, elevation, CrossingDirection::Falling)
        };

        SolarPath {
            date,
            coordinate: self.coordinate,
            midnight,
            dawn: rising(self.twilight_elevation),
            sunrise: rising(self.horizon_elevation),
            morning_golden_hour_end: rising(self.golden_hour_elevation),
            solar_noon,
            evening_golden_hour_start: falling(self.golden_hour_elevation),
            sunset: falling(self.horizon_elevation),
            dusk: falling(self.twilight_elevation),
            next_midnight,
            noon_elevation: self.elevation_at(solar_noon),
            midnight_elevation: self.elevation_at(midnight),
        }
    }

    /// First instant in `[from, to]` where the elevation crosses `elevation`
    /// in the given direction.
    pub fn find_crossing(
        &self,
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
        elevation: f64,
        direction: CrossingDirection,
    ) -> Option<DateTime<FixedOffset>> {
        let is_above = |secs: f64| self.elevation_at(offset_by(from, secs)) >= elevation;
        let (step, steps) = self.grid(from, to);

        let mut previous = is_above(0.0);
        let mut bracket = None;
        for i in 1..=steps {
            let current = is_above(i as f64 * step);
            let crossed = match direction {
                CrossingDirection::Rising => !previous && current,
                CrossingDirection::Falling => previous && !current,
            };
            if crossed {
                bracket = Some(((i - 1) as f64 * step, i as f64 * step));
                break;
            }
            previous = current;
        }

        let (mut lo, mut hi) = bracket?;
        let lo_state = direction == CrossingDirection::Falling;
        for _ in 0..MAX_REFINEMENT_ITERATIONS {
            if hi - lo <= CROSSING_TOLERANCE_SECS {
                break;
            }
            let mid = 0.5 * (lo + hi);
            if is_above(mid) == lo_state {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Some(offset_by(from, 0.5 * (lo + hi)))
    }

    /// Instant of the highest (or lowest) elevation within `[from, to]`.
    fn find_extremum(
        &self,
        from: DateTime<FixedOffset>,
        to: DateTime<FixedOffset>,
        maximize: bool,
    ) -> DateTime<FixedOffset> {
        let score = |secs: f64| {
            let elevation = self.elevation_at(offset_by(from, secs));
            if maximize { elevation } else { -elevation }
        };
        let (step, steps) = self.grid(from, to);
        let span = step * steps as f64;

        let mut best_index = 0;
        let mut best_score = score(0.0);
        for i in 1..=steps {
            let current = score(i as f64 * step);
            if current > best_score {
                best_index = i;
                best_score = current;
            }
        }

        let mut lo = ((best_index as f64 - 1.0) * step).max(0.0);
        let mut hi = ((best_index as f64 + 1.0) * step).min(span);
        for _ in 0..MAX_REFINEMENT_ITERATIONS {
            if hi - lo <= CROSSING_TOLERANCE_SECS {
                break;
            }
            let m1 = lo + (hi - lo) / 3.0;
            let m2 = hi - (hi - lo) / 3.0;
            if score(m1) < score(m2) {
                lo = m1;
            } else {
                hi = m2;
            }
        }
        offset_by(from, 0.5 * (lo + hi))
    }

    /// Evenly spaced sample grid no coarser than the configured step.
    fn grid(&self, from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> (f64, usize) {
        let span = seconds_between(from, to).max(0.0);
        let steps = (span / self.step_secs).ceil().max(1.0) as usize;
        (span / steps as f64, steps)
    }
}

/// Start of `date` in the given offset.
pub fn local_midnight(date: NaiveDate, offset: FixedOffset) -> DateTime<FixedOffset> {
    let naive_utc =
        date.and_time(NaiveTime::MIN) - Duration::seconds(i64::from(offset.local_minus_utc()));
    DateTime::from_naive_utc_and_offset(naive_utc, offset)
}

pub(crate) fn seconds_between(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

fn offset_by(instant: DateTime<FixedOffset>, secs: f64) -> DateTime<FixedOffset> {
    instant + Duration::milliseconds((secs * 1000.0).round() as i64)
}
