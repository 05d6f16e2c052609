//! Time source abstraction for real and simulated clocks.
//!
//! The engine itself takes explicit instants. Hosts that tick it from a timer
//! go through a [`TimeSource`] so the same loop can run against the system
//! clock or against a simulated clock that jumps through a day instantly.

use chrono::{DateTime, Duration as ChronoDuration, FixedOffset, Local};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Current local time with its UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Sleep for the specified duration (or simulate it)
    fn sleep(&self, duration: StdDuration);

    fn is_simulated(&self) -> bool;

    /// Whether a simulation has reached its end (always false for real time)
    fn is_ended(&self) -> bool {
        false
    }
}

/// The system clock in the local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    fn sleep(&self, duration: StdDuration) {
        std::thread::sleep(duration);
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// A clock that only moves when told to.
///
/// `sleep` advances the clock by the requested duration without blocking,
/// stopping at the optional end time.
#[derive(Debug)]
pub struct SimulatedTimeSource {
    current: Mutex<DateTime<FixedOffset>>,
    end_time: Option<DateTime<FixedOffset>>,
}

impl SimulatedTimeSource {
    pub fn new(start_time: DateTime<FixedOffset>) -> Self {
        Self {
            current: Mutex::new(start_time),
            end_time: None,
        }
    }

    /// A simulation that runs from `start_time` until `end_time`.
    pub fn until(start_time: DateTime<FixedOffset>, end_time: DateTime<FixedOffset>) -> Self {
        Self {
            current: Mutex::new(start_time.min(end_time)),
            end_time: Some(end_time),
        }
    }

    /// Jump to an arbitrary instant, ignoring the end time.
    pub fn set(&self, instant: DateTime<FixedOffset>) {
        *self.lock() = instant;
    }

    /// Move the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: ChronoDuration) {
        let mut current = self.lock();
        let next = *current + by;
        *current = match self.end_time {
            Some(end) => next.min(end),
            None => next,
        };
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DateTime<FixedOffset>> {
        // The guarded value is a plain timestamp; a poisoned lock still holds a valid one
        self.current
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TimeSource for SimulatedTimeSource {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.lock()
    }

    fn sleep(&self, duration: StdDuration) {
        let by = ChronoDuration::from_std(duration).unwrap_or(ChronoDuration::MAX);
        let mut current = self.lock();
        let next = current.checked_add_signed(by).unwrap_or(*current);
        *current = match self.end_time {
            Some(end) => next.min(end),
            None => next,
        };
    }

    fn is_simulated(&self) -> bool {
        true
    }

    fn is_ended(&self) -> bool {
        self.end_time.is_some_and(|end| *self.lock() >= end)
    }
}
