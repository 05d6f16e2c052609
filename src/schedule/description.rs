//! Parsed wallpaper descriptions.
//!
//! A description is what the package loader hands to the engine: the schedule
//! kind, an ordered list of images with the moment each one belongs to, and an
//! optional cross-fade duration. Images are opaque references; the engine never
//! opens them.
//!
//! Descriptions can be built in code or parsed from a TOML or JSON document:
//!
//! ```toml
//! kind = "solar"
//! cross_fade_duration = 1800     # seconds, optional
//!
//! [[images]]
//! image = "night.jpg"
//! role = "midnight"
//!
//! [[images]]
//! image = "morning.jpg"
//! elevation = 12.5               # sun position the photo was taken at
//! azimuth = 105.0
//!
//! [[images]]
//! image = "clock.jpg"
//! time = "21:30"                 # literal time of day
//! cross_fade = false
//! ```

use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geo::SolarEvent;

/// How knot phases are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleKind {
    /// Literal times of day.
    Fixed,
    /// Today's solar events at the user's location.
    Solar,
}

impl ScheduleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleKind::Fixed => "fixed",
            ScheduleKind::Solar => "solar",
        }
    }
}

/// Opaque reference to one image of a wallpaper package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageRef {
    fn from(reference: &str) -> Self {
        Self::new(reference)
    }
}

impl From<String> for ImageRef {
    fn from(reference: String) -> Self {
        Self(reference)
    }
}

/// The moment of the day an image belongs to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KnotTime {
    /// Wall-clock time of day.
    TimeOfDay(NaiveTime),
    /// A named solar event.
    Event(SolarEvent),
    /// The sun position the image depicts, in degrees.
    SunPosition { elevation: f64, azimuth: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescriptionEntry {
    pub time: KnotTime,
    pub image: ImageRef,
    /// Whether this image fades into the next one.
    pub cross_fade: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WallpaperDescription {
    pub kind: ScheduleKind,
    pub entries: Vec<DescriptionEntry>,
    /// Length of the fade before each knot, in seconds. `None` fades across the
    /// whole interval between two knots.
    pub cross_fade_duration: Option<f64>,
}

impl WallpaperDescription {
    pub fn new(kind: ScheduleKind) -> Self {
        Self {
            kind,
            entries: Vec::new(),
            cross_fade_duration: None,
        }
    }

    pub fn fixed() -> Self {
        Self::new(ScheduleKind::Fixed)
    }

    pub fn solar() -> Self {
        Self::new(ScheduleKind::Solar)
    }

    pub fn with_entry(mut self, time: KnotTime, image: impl Into<ImageRef>) -> Self {
        self.entries.push(DescriptionEntry {
            time,
            image: image.into(),
            cross_fade: true,
        });
        self
    }

    pub fn with_time(self, time: NaiveTime, image: impl Into<ImageRef>) -> Self {
        self.with_entry(KnotTime::TimeOfDay(time), image)
    }

    pub fn with_event(self, event: SolarEvent, image: impl Into<ImageRef>) -> Self {
        self.with_entry(KnotTime::Event(event), image)
    }

    pub fn with_sun_position(
        self,
        elevation: f64,
        azimuth: f64,
        image: impl Into<ImageRef>,
    ) -> Self {
        self.with_entry(KnotTime::SunPosition { elevation, azimuth }, image)
    }

    pub fn with_cross_fade_duration(mut self, seconds: f64) -> Self {
        self.cross_fade_duration = Some(seconds);
        self
    }

    /// Disable cross-fading out of the most recently added entry.
    pub fn without_cross_fade(mut self) -> Self {
        if let Some(entry) = self.entries.last_mut() {
            entry.cross_fade = false;
        }
        self
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw: RawDescription =
            toml::from_str(content).context("Failed to parse wallpaper description as TOML")?;
        raw.try_into()
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let raw: RawDescription = serde_json::from_str(content)
            .context("Failed to parse wallpaper description as JSON")?;
        raw.try_into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescription {
    kind: ScheduleKind,
    cross_fade_duration: Option<f64>,
    images: Vec<RawEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEntry {
    image: String,
    time: Option<String>,
    #[serde(alias = "event")]
    role: Option<SolarEvent>,
    elevation: Option<f64>,
    azimuth: Option<f64>,
    cross_fade: Option<bool>,
}

impl TryFrom<RawDescription> for WallpaperDescription {
    type Error = anyhow::Error;

    fn try_from(raw: RawDescription) -> Result<Self> {
        if let Some(duration) = raw.cross_fade_duration
            && !(duration.is_finite() && duration >= 0.0)
        {
            anyhow::bail!("cross_fade_duration must be a non-negative number of seconds");
        }

        let entries = raw
            .images
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                DescriptionEntry::try_from(entry)
                    .with_context(|| format!("Invalid image entry #{}", index + 1))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            kind: raw.kind,
            entries,
            cross_fade_duration: raw.cross_fade_duration,
        })
    }
}

impl TryFrom<RawEntry> for DescriptionEntry {
    type Error = anyhow::Error;

    fn try_from(raw: RawEntry) -> Result<Self> {
        let sun_position = match (raw.elevation, raw.azimuth) {
            (Some(elevation), Some(azimuth)) => Some(KnotTime::SunPosition { elevation, azimuth }),
            (None, None) => None,
            (Some(_), None) => anyhow::bail!("elevation was specified but azimuth was not"),
            (None, Some(_)) => anyhow::bail!("azimuth was specified but elevation was not"),
        };
        let time_of_day = raw
            .time
            .as_deref()
            .map(parse_time_of_day)
            .transpose()?
            .map(KnotTime::TimeOfDay);
        let event = raw.role.map(KnotTime::Event);

        let time = match (time_of_day, event, sun_position) {
            (Some(time), None, None) | (None, Some(time), None) | (None, None, Some(time)) => time,
            (None, None, None) => {
                anyhow::bail!("one of time, role or elevation/azimuth is required")
            }
            _ => anyhow::bail!("only one of time, role or elevation/azimuth may be given"),
        };

        Ok(Self {
            time,
            image: ImageRef::new(raw.image),
            cross_fade: raw.cross_fade.unwrap_or(true),
        })
    }
}

fn parse_time_of_day(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
        .with_context(|| format!("Invalid time '{text}', expected HH:MM:SS or HH:MM"))
}
