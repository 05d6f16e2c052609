//! Schedules that follow the sun at the user's location.
//!
//! A solar schedule is built for one local calendar day. Each image is placed
//! at today's instant of its solar event (or sun position, or clock time), and
//! phases are measured from the solar midnight that opens the day. The cycle
//! runs until the following solar midnight, so it is close to but not exactly
//! 24 hours long.

use chrono::{DateTime, Days, FixedOffset, NaiveDate, NaiveTime};

use crate::config::Config;
use crate::error::EngineError;
use crate::geo::path::{local_midnight, seconds_between};
use crate::geo::{Coordinate, CrossingDirection, SolarPath, SolarPathSampler};
use crate::schedule::{Knot, KnotSequence, KnotTime, Layers, WallpaperDescription};

#[derive(Debug, Clone, PartialEq)]
pub struct SolarSchedule {
    path: SolarPath,
    knots: KnotSequence,
    cross_fade_duration: Option<f64>,
    offset: FixedOffset,
}

impl SolarSchedule {
    /// Build the schedule for the local date of `now` at `coordinate`.
    ///
    /// Fails with [`EngineError::NearPoleDegeneracy`] when the sun does not both
    /// rise and set that day. Other events that do not happen are skipped.
    pub fn build(
        description: &WallpaperDescription,
        coordinate: Option<Coordinate>,
        now: DateTime<FixedOffset>,
        config: &Config,
    ) -> Result<Self, EngineError> {
        let coordinate = coordinate.ok_or(EngineError::MissingCoordinate)?;
        let date = now.date_naive();
        let offset = *now.offset();

        let sampler = SolarPathSampler::new(coordinate, config);
        let path = sampler.sample(date, offset);
        if !path.has_sunrise_and_sunset() {
            log_pipe!();
            if path.is_polar_day() {
                log_warning!("Polar day at {coordinate} on {date}: the sun never sets");
            } else if path.is_polar_night() {
                log_warning!("Polar night at {coordinate} on {date}: the sun never rises");
            } else {
                log_warning!("The sun does not both rise and set at {coordinate} on {date}");
            }
            return Err(EngineError::NearPoleDegeneracy {
                latitude: coordinate.latitude(),
                longitude: coordinate.longitude(),
                date,
            });
        }

        let mut knots = Vec::with_capacity(description.entries.len());
        for entry in &description.entries {
            if entry.image.as_str().is_empty() {
                log_warning!("Skipping an entry with an empty image reference");
                continue;
            }
            let instant = match entry.time {
                KnotTime::TimeOfDay(time) => Some(local_instant(date, time, offset)),
                KnotTime::Event(event) => {
                    let instant = path.event(event);
                    if instant.is_none() {
                        log_warning!(
                            "Skipping {}: {} does not occur on {date}",
                            entry.image,
                            event.display_name()
                        );
                    }
                    instant
                }
                KnotTime::SunPosition { elevation, azimuth } => Some(resolve_sun_position(
                    &sampler, &path, elevation, azimuth,
                )),
            };
            if let Some(instant) = instant {
                knots.push(Knot {
                    phase: seconds_between(path.midnight, instant),
                    image: entry.image.clone(),
                    cross_fade: entry.cross_fade,
                });
            }
        }

        let knots = KnotSequence::new(knots, path.cycle_length())?;

        log_block_start!("Built solar wallpaper schedule");
        path.log_events();
        log_indented!("Images: {}", knots.len());
        log_indented!("Cycle length: {:.2}h", knots.cycle_length() / 3600.0);

        Ok(Self {
            path,
            knots,
            cross_fade_duration: description.cross_fade_duration,
            offset,
        })
    }

    /// Whether this schedule no longer describes the day of `now` at `coordinate`.
    ///
    /// A new local date, a new UTC offset or a different (or missing) location
    /// all require a rebuild.
    pub fn is_expired(&self, now: DateTime<FixedOffset>, coordinate: Option<Coordinate>) -> bool {
        now.date_naive() != self.path.date
            || *now.offset() != self.offset
            || coordinate != Some(self.path.coordinate)
    }

    /// Seconds since this schedule's solar midnight, wrapped into the cycle.
    pub fn phase_at(&self, instant: DateTime<FixedOffset>) -> f64 {
        self.knots.normalize(seconds_between(self.path.midnight, instant))
    }

    pub fn evaluate(&self, instant: DateTime<FixedOffset>) -> Layers {
        self.knots
            .bracket(self.phase_at(instant))
            .layers(self.cross_fade_duration)
    }

    /// Local midnight ending the anchor date, when the schedule expires.
    pub fn next_expiry(&self) -> Option<DateTime<FixedOffset>> {
        let next_date = self.path.date.checked_add_days(Days::new(1))?;
        Some(local_midnight(next_date, self.offset))
    }

    pub fn anchor_date(&self) -> NaiveDate {
        self.path.date
    }

    pub fn coordinate(&self) -> Coordinate {
        self.path.coordinate
    }

    pub fn path(&self) -> &SolarPath {
        &self.path
    }

    pub fn knots(&self) -> &KnotSequence {
        &self.knots
    }
}

fn local_instant(date: NaiveDate, time: NaiveTime, offset: FixedOffset) -> DateTime<FixedOffset> {
    local_midnight(date, offset) + (time - NaiveTime::MIN)
}

/// Today's instant where the sun stands at `elevation` on the side of the sky
/// given by `azimuth`. Elevations the sun never reaches clamp to noon or midnight.
fn resolve_sun_position(
    sampler: &SolarPathSampler,
    path: &SolarPath,
    elevation: f64,
    azimuth: f64,
) -> DateTime<FixedOffset> {
    let (from, to, lowest, direction) = if azimuth.rem_euclid(360.0) < 180.0 {
        (
            path.midnight,
            path.solar_noon,
            path.midnight,
            CrossingDirection::Rising,
        )
    } else {
        (
            path.solar_noon,
            path.next_midnight,
            path.next_midnight,
            CrossingDirection::Falling,
        )
    };

    if elevation >= path.noon_elevation {
        return path.solar_noon;
    }
    if elevation <= sampler.elevation_at(lowest) {
        return lowest;
    }
    sampler
        .find_crossing(from, to, elevation, direction)
        .unwrap_or_else(|| {
            // Only reachable when the crossing falls between two samples at an extremum
            if elevation - sampler.elevation_at(lowest) < path.noon_elevation - elevation {
                lowest
            } else {
                path.solar_noon
            }
        })
}
