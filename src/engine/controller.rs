//! The wallpaper engine: inputs, dirty state and refresh.
//!
//! The host feeds the engine a description and optionally a location, then
//! calls [`WallpaperEngine::update`] from its own timer. Changing an input only
//! marks the state dirty; the model is rebuilt on the next update, so bursts of
//! changes between two ticks cost a single rebuild.

use chrono::{DateTime, FixedOffset};
use std::time::Duration as StdDuration;

use super::TimeModel;
use crate::config::Config;
use crate::error::EngineError;
use crate::geo::Coordinate;
use crate::schedule::{Layers, WallpaperDescription};
use crate::time_source::TimeSource;

/// Lifecycle of the engine's model.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineState {
    /// Inputs changed since the last build.
    Uninitialized,
    Ready(TimeModel),
    /// The last build failed; stays until an input changes.
    Failed(EngineError),
}

#[derive(Debug, Clone)]
pub struct WallpaperEngine {
    config: Config,
    description: Option<WallpaperDescription>,
    coordinate: Option<Coordinate>,
    state: EngineState,
    last_good: Option<Layers>,
}

impl WallpaperEngine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            description: None,
            coordinate: None,
            state: EngineState::Uninitialized,
            last_good: None,
        }
    }

    pub fn with_description(config: Config, description: WallpaperDescription) -> Self {
        let mut engine = Self::new(config);
        engine.set_description(description);
        engine
    }

    /// Select a new wallpaper. The model is rebuilt on the next update.
    pub fn set_description(&mut self, description: WallpaperDescription) {
        self.description = Some(description);
        self.state = EngineState::Uninitialized;
    }

    /// Move the user to a new location.
    ///
    /// Out of range values are rejected and leave the engine untouched. Setting
    /// the current location again does nothing.
    pub fn set_location(&mut self, latitude: f64, longitude: f64) -> Result<(), EngineError> {
        let coordinate = Coordinate::new(latitude, longitude)?;
        if self.coordinate == Some(coordinate) {
            return Ok(());
        }
        log_debug!("Location changed to {coordinate}");
        self.coordinate = Some(coordinate);
        self.state = EngineState::Uninitialized;
        Ok(())
    }

    pub fn clear_location(&mut self) {
        if self.coordinate.take().is_some() {
            self.state = EngineState::Uninitialized;
        }
    }

    /// Force a rebuild on the next update, also clearing a failure.
    pub fn invalidate(&mut self) {
        self.state = EngineState::Uninitialized;
    }

    /// Bring the model up to date for `now` and evaluate it.
    ///
    /// A failed build is reported again on every call until an input changes or
    /// [`invalidate`](Self::invalidate) is called.
    pub fn update(&mut self, now: DateTime<FixedOffset>) -> Result<Layers, EngineError> {
        let model = match std::mem::replace(&mut self.state, EngineState::Uninitialized) {
            EngineState::Failed(error) => {
                self.state = EngineState::Failed(error.clone());
                return Err(error);
            }
            EngineState::Ready(model) if !model.is_expired(now, self.coordinate) => model,
            EngineState::Ready(model) => {
                log_decorated!(
                    "{} schedule is out of date, rebuilding",
                    capitalize(model.kind().as_str())
                );
                self.build_model(now)?
            }
            EngineState::Uninitialized => self.build_model(now)?,
        };

        let layers = model.evaluate(now);
        log_debug!(
            "{} phase {:.1}s: {} -> {} at {:.3}",
            now.format("%Y-%m-%d %H:%M:%S"),
            model.phase_at(now),
            layers.bottom,
            layers.top,
            layers.blend
        );

        self.state = EngineState::Ready(model);
        self.last_good = Some(layers.clone());
        Ok(layers)
    }

    /// [`update`](Self::update) at the time reported by `source`.
    pub fn tick(&mut self, source: &dyn TimeSource) -> Result<Layers, EngineError> {
        self.update(source.now())
    }

    /// How long the host may wait before the next tick.
    ///
    /// Never longer than the configured update interval, and never past the
    /// moment the current model expires.
    pub fn next_update_delay(&self, now: DateTime<FixedOffset>) -> StdDuration {
        let interval = self.config.update_interval();
        match &self.state {
            EngineState::Ready(model) => match model.next_expiry() {
                Some(expiry) => (expiry - now).to_std().unwrap_or(StdDuration::ZERO).min(interval),
                None => interval,
            },
            _ => interval,
        }
    }

    fn build_model(&mut self, now: DateTime<FixedOffset>) -> Result<TimeModel, EngineError> {
        let built = match &self.description {
            Some(description) => TimeModel::build(description, self.coordinate, now, &self.config),
            None => Err(EngineError::invalid_description(
                "no wallpaper description has been set",
            )),
        };
        built.inspect_err(|error| {
            log_error!("{error}");
            self.state = EngineState::Failed(error.clone());
        })
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn model(&self) -> Option<&TimeModel> {
        match &self.state {
            EngineState::Ready(model) => Some(model),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&EngineError> {
        match &self.state {
            EngineState::Failed(error) => Some(error),
            _ => None,
        }
    }

    /// The last layers produced by a successful update, for display while failed.
    pub fn last_good(&self) -> Option<&Layers> {
        self.last_good.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn description(&self) -> Option<&WallpaperDescription> {
        self.description.as_ref()
    }

    pub fn coordinate(&self) -> Option<Coordinate> {
        self.coordinate
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::SolarEvent;
    use chrono::NaiveTime;

    fn at(text: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(text).unwrap()
    }

    fn fixed() -> WallpaperDescription {
        WallpaperDescription::fixed()
            .with_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap(), "night")
            .with_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap(), "day")
    }

    fn solar() -> WallpaperDescription {
        WallpaperDescription::solar()
            .with_event(SolarEvent::Sunrise, "sunrise")
            .with_event(SolarEvent::Sunset, "sunset")
    }

    #[test]
    fn test_update_builds_lazily() {
        let mut engine = WallpaperEngine::with_description(Config::default(), fixed());
        assert_eq!(engine.state(), &EngineState::Uninitialized);

        let layers = engine.update(at("2024-05-01T06:00:00+00:00")).unwrap();
        assert_eq!(layers.blend, 0.5);
        assert!(engine.model().is_some());
        assert_eq!(engine.last_good(), Some(&layers));
    }

    #[test]
    fn test_update_without_description_fails() {
        let mut engine = WallpaperEngine::new(Config::default());
        let result = engine.update(at("2024-05-01T06:00:00+00:00"));
        assert!(matches!(result, Err(EngineError::InvalidDescription { .. })));
        assert!(engine.error().is_some());
    }

    #[test]
    fn test_failure_is_sticky_until_inputs_change() {
        let mut engine = WallpaperEngine::with_description(Config::default(), solar());
        let now = at("2024-03-20T10:00:00+01:00");

        assert_eq!(engine.update(now), Err(EngineError::MissingCoordinate));
        // Still failed on a later day even though nothing else changed
        assert_eq!(
            engine.update(at("2024-03-22T10:00:00+01:00")),
            Err(EngineError::MissingCoordinate)
        );

        engine.set_location(52.52, 13.405).unwrap();
        assert!(engine.update(now).is_ok());
    }

    #[test]
    fn test_invalid_location_leaves_state_alone() {
        let mut engine = WallpaperEngine::with_description(Config::default(), solar());
        engine.set_location(52.52, 13.405).unwrap();
        let now = at("2024-03-20T10:00:00+01:00");
        engine.update(now).unwrap();

        let result = engine.set_location(95.0, 0.0);
        assert!(matches!(result, Err(EngineError::InvalidCoordinate { .. })));
        assert!(matches!(engine.state(), EngineState::Ready(_)));
        assert_eq!(engine.coordinate(), Some(Coordinate::new(52.52, 13.405).unwrap()));
    }

    #[test]
    fn test_same_location_keeps_model() {
        let mut engine = WallpaperEngine::with_description(Config::default(), solar());
        engine.set_location(52.52, 13.405).unwrap();
        engine.update(at("2024-03-20T10:00:00+01:00")).unwrap();

        engine.set_location(52.52, 13.405).unwrap();
        assert!(matches!(engine.state(), EngineState::Ready(_)));

        engine.clear_location();
        assert_eq!(engine.state(), &EngineState::Uninitialized);
    }

    #[test]
    fn test_invalidate_clears_failure() {
        let mut engine = WallpaperEngine::new(Config::default());
        assert!(engine.update(at("2024-05-01T06:00:00+00:00")).is_err());
        engine.invalidate();
        assert_eq!(engine.state(), &EngineState::Uninitialized);
    }

    #[test]
    fn test_next_update_delay() {
        let mut engine = WallpaperEngine::with_description(Config::default(), fixed());
        let now = at("2024-05-01T23:59:30+00:00");
        assert_eq!(engine.next_update_delay(now), StdDuration::from_secs(60));
        engine.update(now).unwrap();
        assert_eq!(engine.next_update_delay(now), StdDuration::from_secs(60));

        let mut engine = WallpaperEngine::with_description(Config::default(), solar());
        engine.set_location(52.52, 13.405).unwrap();
        let now = at("2024-03-20T23:59:30+01:00");
        engine.update(now).unwrap();
        assert_eq!(engine.next_update_delay(now), StdDuration::from_secs(30));
    }

    #[test]
    fn test_unvalidated_sample_interval_still_builds() {
        for sample_interval in [0, u64::MAX] {
            let config = Config {
                sample_interval: Some(sample_interval),
                ..Default::default()
            };
            let mut engine = WallpaperEngine::with_description(config, solar());
            engine.set_location(52.52, 13.405).unwrap();
            let layers = engine.update(at("2024-03-20T10:00:00+01:00")).unwrap();
            assert!((0.0..=1.0).contains(&layers.blend));
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("solar"), "Solar");
        assert_eq!(capitalize(""), "");
    }
}
