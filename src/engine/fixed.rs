//! Schedules pinned to literal times of day.

use chrono::{DateTime, FixedOffset, NaiveTime, Timelike};

use crate::constants::SECONDS_PER_DAY;
use crate::error::EngineError;
use crate::schedule::{Knot, KnotSequence, KnotTime, Layers, WallpaperDescription};

/// A schedule whose knots sit at wall-clock times and repeat every civil day.
///
/// Once built it never needs rebuilding: the same knots apply to every day.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedSchedule {
    knots: KnotSequence,
    cross_fade_duration: Option<f64>,
}

impl FixedSchedule {
    pub fn build(description: &WallpaperDescription) -> Result<Self, EngineError> {
        let mut knots = Vec::with_capacity(description.entries.len());
        for entry in &description.entries {
            if entry.image.as_str().is_empty() {
                log_warning!("Skipping an entry with an empty image reference");
                continue;
            }
            match entry.time {
                KnotTime::TimeOfDay(time) => knots.push(Knot {
                    phase: seconds_since_midnight(time),
                    image: entry.image.clone(),
                    cross_fade: entry.cross_fade,
                }),
                KnotTime::Event(event) => log_warning!(
                    "Skipping {}: {} is not a time of day",
                    entry.image,
                    event.display_name()
                ),
                KnotTime::SunPosition { .. } => log_warning!(
                    "Skipping {}: sun positions need a solar schedule",
                    entry.image
                ),
            }
        }

        let knots = KnotSequence::new(knots, SECONDS_PER_DAY)?;

        log_block_start!("Built fixed wallpaper schedule");
        log_indented!("Images: {}", knots.len());
        if let Some(duration) = description.cross_fade_duration {
            log_indented!("Cross-fade: {duration}s before each image");
        }

        Ok(Self {
            knots,
            cross_fade_duration: description.cross_fade_duration,
        })
    }

    /// A fixed schedule is valid forever.
    pub fn is_expired(&self) -> bool {
        false
    }

    /// Seconds since local midnight of `instant`, in its own offset.
    pub fn phase_at(&self, instant: DateTime<FixedOffset>) -> f64 {
        self.knots.normalize(seconds_since_midnight(instant.time()))
    }

    pub fn evaluate(&self, instant: DateTime<FixedOffset>) -> Layers {
        self.knots
            .bracket(self.phase_at(instant))
            .layers(self.cross_fade_duration)
    }

    pub fn knots(&self) -> &KnotSequence {
        &self.knots
    }
}

fn seconds_since_midnight(time: NaiveTime) -> f64 {
    // Leap seconds report nanos past 1e9; fold them into the last second
    let nanos = time.nanosecond().min(999_999_999);
    f64::from(time.num_seconds_from_midnight()) + f64::from(nanos) / 1e9
}
