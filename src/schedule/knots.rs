//! Cyclic keyframe sequences.
//!
//! A [`KnotSequence`] holds the images of one schedule cycle sorted by phase.
//! The knot after the last one is the first one again, shifted by one cycle,
//! so every phase falls between exactly two cyclically adjacent knots.

use super::{ImageRef, Layers};
use crate::error::EngineError;

/// One keyframe: an image pinned to a phase of the cycle, in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Knot {
    pub phase: f64,
    pub image: ImageRef,
    pub cross_fade: bool,
}

impl Knot {
    pub fn new(phase: f64, image: impl Into<ImageRef>) -> Self {
        Self {
            phase,
            image: image.into(),
            cross_fade: true,
        }
    }
}

/// Sorted, de-duplicated, non-empty set of knots over one cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct KnotSequence {
    knots: Vec<Knot>,
    cycle_length: f64,
}

/// The two knots around a phase and how far the phase is between them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bracket<'a> {
    pub lower: &'a Knot,
    pub upper: &'a Knot,
    /// Normalized position between `lower` and `upper`, in [0, 1].
    pub weight: f64,
    /// Seconds from `lower` to `upper`, accounting for wraparound.
    pub span: f64,
    /// Seconds from `lower` to the phase.
    pub elapsed: f64,
}

impl KnotSequence {
    /// Build a sequence from knots in description order.
    ///
    /// Phases are normalized into `[0, cycle_length)`. When two knots share a
    /// phase the one given later wins. Knots with a non-finite phase are dropped.
    pub fn new(knots: Vec<Knot>, cycle_length: f64) -> Result<Self, EngineError> {
        if !(cycle_length.is_finite() && cycle_length > 0.0) {
            return Err(EngineError::invalid_description(format!(
                "cycle length must be positive (got {cycle_length})"
            )));
        }

        let mut knots: Vec<Knot> = knots
            .into_iter()
            .filter(|knot| {
                let usable = knot.phase.is_finite();
                if !usable {
                    log_warning!("Ignoring image {} with an undefined phase", knot.image);
                }
                usable
            })
            .map(|mut knot| {
                knot.phase = normalize(knot.phase, cycle_length);
                knot
            })
            .collect();

        // Stable sort keeps description order among equal phases
        knots.sort_by(|a, b| a.phase.total_cmp(&b.phase));
        knots.dedup_by(|later, earlier| {
            if later.phase != earlier.phase {
                return false;
            }
            log_warning!(
                "Images {} and {} share a phase, keeping {}",
                earlier.image,
                later.image,
                later.image
            );
            std::mem::swap(later, earlier);
            true
        });

        if knots.is_empty() {
            return Err(EngineError::invalid_description(
                "the description contains no usable image",
            ));
        }

        Ok(Self {
            knots,
            cycle_length,
        })
    }

    pub fn knots(&self) -> &[Knot] {
        &self.knots
    }

    pub fn len(&self) -> usize {
        self.knots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.knots.is_empty()
    }

    pub fn cycle_length(&self) -> f64 {
        self.cycle_length
    }

    /// Map any phase into `[0, cycle_length)`.
    pub fn normalize(&self, phase: f64) -> f64 {
        normalize(phase, self.cycle_length)
    }

    /// Find the knots surrounding `phase`.
    ///
    /// `lower.phase <= phase < upper.phase` modulo the cycle. A phase equal to a
    /// knot's phase selects that knot as `lower` with weight 0. With a single
    /// knot, `lower` and `upper` are the same and the weight is always 0.
    pub fn bracket(&self, phase: f64) -> Bracket<'_> {
        let phase = self.normalize(phase);
        let count = self.knots.len();

        let after = self.knots.partition_point(|knot| knot.phase <= phase);
        let lower_index = if after == 0 { count - 1 } else { after - 1 };
        let upper_index = (lower_index + 1) % count;
        let lower = &self.knots[lower_index];
        let upper = &self.knots[upper_index];

        let mut span = upper.phase - lower.phase;
        if span <= 0.0 {
            span += self.cycle_length;
        }
        let mut elapsed = phase - lower.phase;
        if elapsed < 0.0 {
            elapsed += self.cycle_length;
        }

        // A lone knot is its own neighbour and never blends
        if count == 1 {
            elapsed = 0.0;
        }
        let weight = (elapsed / span).clamp(0.0, 1.0);

        Bracket {
            lower,
            upper,
            weight,
            span,
            elapsed,
        }
    }
}

impl Bracket<'_> {
    /// Blend factor after applying the cross-fade policy.
    ///
    /// With a cross-fade duration shorter than the span, the bottom image holds
    /// until `duration` seconds before the upper knot and then fades linearly.
    /// A lower knot with cross-fading disabled never blends.
    pub fn blend(&self, cross_fade_duration: Option<f64>) -> f64 {
        if !self.lower.cross_fade {
            return 0.0;
        }
        match cross_fade_duration {
            Some(duration) if duration < self.span => {
                let hold = self.span - duration;
                if self.elapsed <= hold || duration <= 0.0 {
                    0.0
                } else {
                    ((self.elapsed - hold) / duration).clamp(0.0, 1.0)
                }
            }
            _ => self.weight,
        }
    }

    /// Bottom image, top image and blend factor for this bracket.
    pub fn layers(&self, cross_fade_duration: Option<f64>) -> Layers {
        let top = if self.lower.cross_fade {
            self.upper.image.clone()
        } else {
            self.lower.image.clone()
        };
        Layers {
            bottom: self.lower.image.clone(),
            top,
            blend: self.blend(cross_fade_duration),
        }
    }
}

fn normalize(phase: f64, cycle_length: f64) -> f64 {
    let normalized = phase.rem_euclid(cycle_length);
    // rem_euclid can round up to the cycle length for tiny negative inputs
    if normalized >= cycle_length {
        0.0
    } else {
        normalized
    }
}
