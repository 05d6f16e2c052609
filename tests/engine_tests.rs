use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone};
use std::time::Duration as StdDuration;
use sunwall::engine::{EngineState, TimeModel};
use sunwall::{
    Config, EngineError, SimulatedTimeSource, SolarEvent, TimeSource, WallpaperDescription,
    WallpaperEngine,
};

fn at(text: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(text).unwrap()
}

fn hms(h: u32, m: u32, s: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, s).unwrap()
}

fn solar_description() -> WallpaperDescription {
    WallpaperDescription::solar()
        .with_event(SolarEvent::Midnight, "night")
        .with_event(SolarEvent::Dawn, "dawn")
        .with_event(SolarEvent::Sunrise, "sunrise")
        .with_event(SolarEvent::Noon, "noon")
        .with_event(SolarEvent::Sunset, "sunset")
        .with_event(SolarEvent::Dusk, "dusk")
}

fn anchor_date(engine: &WallpaperEngine) -> Option<chrono::NaiveDate> {
    match engine.model() {
        Some(TimeModel::Solar(model)) => Some(model.anchor_date()),
        _ => None,
    }
}

#[cfg(test)]
mod fixed_schedule_tests {
    use super::*;

    /// Knots at 00:00, 06:00 and 18:00; 03:00 is half way from night to day
    #[test]
    fn test_fixed_scenario() {
        let description = WallpaperDescription::fixed()
            .with_time(hms(0, 0, 0), "night")
            .with_time(hms(6, 0, 0), "day")
            .with_time(hms(18, 0, 0), "dusk");
        let mut engine = WallpaperEngine::with_description(Config::default(), description);

        let layers = engine.update(at("2024-01-15T03:00:00-05:00")).unwrap();
        assert_eq!(layers.bottom.as_str(), "night");
        assert_eq!(layers.top.as_str(), "day");
        assert_eq!(layers.blend, 10_800.0 / 21_600.0);
    }

    /// Parsed documents drive the engine the same as hand-built descriptions
    #[test]
    fn test_fixed_schedule_from_toml() {
        let description = WallpaperDescription::from_toml_str(
            r#"
            kind = "fixed"
            cross_fade_duration = 3600

            [[images]]
            image = "morning.png"
            time = "06:00"

            [[images]]
            image = "evening.png"
            time = "18:00"
            "#,
        )
        .unwrap();
        let mut engine = WallpaperEngine::with_description(Config::default(), description);

        // Holds the morning image until an hour before the evening knot
        let noon = engine.update(at("2024-01-15T12:00:00+00:00")).unwrap();
        assert_eq!(noon.bottom.as_str(), "morning.png");
        assert_eq!(noon.blend, 0.0);
        assert!(!noon.is_blending());

        let fading = engine.update(at("2024-01-15T17:30:00+00:00")).unwrap();
        assert_eq!(fading.top.as_str(), "evening.png");
        assert_eq!(fading.blend, 0.5);
        assert!(fading.is_blending());
    }

    /// A fixed model is built once and kept across days
    #[test]
    fn test_fixed_model_survives_midnight() {
        let description = WallpaperDescription::fixed().with_time(hms(8, 0, 0), "only");
        let mut engine = WallpaperEngine::with_description(Config::default(), description);
        engine.update(at("2024-01-15T23:59:00+00:00")).unwrap();
        let model = engine.model().cloned().unwrap();
        assert!(!model.is_expired(at("2024-01-16T00:01:00+00:00"), None));
        assert_eq!(model.next_expiry(), None);

        let layers = engine.update(at("2024-01-16T00:01:00+00:00")).unwrap();
        assert_eq!(layers.bottom, layers.top);
        assert_eq!(layers.blend, 0.0);
    }
}

#[cfg(test)]
mod solar_schedule_tests {
    use super::*;

    /// A model built for date D is expired for an instant on D+1 and rebuilt
    #[test]
    fn test_expiry_across_midnight() {
        let mut engine = WallpaperEngine::with_description(Config::default(), solar_description());
        engine.set_location(48.8566, 2.3522).unwrap();

        engine.update(at("2024-04-10T23:50:00+02:00")).unwrap();
        assert_eq!(anchor_date(&engine).unwrap().to_string(), "2024-04-10");

        let next_day = at("2024-04-11T00:05:00+02:00");
        let model = engine.model().unwrap();
        assert!(model.is_expired(next_day, engine.coordinate()));

        engine.update(next_day).unwrap();
        assert_eq!(anchor_date(&engine).unwrap().to_string(), "2024-04-11");
        assert!(!engine.model().unwrap().is_expired(next_day, engine.coordinate()));
    }

    /// A simulated day of ticks rebuilds exactly once, right after midnight
    #[test]
    fn test_simulated_day_of_ticks() {
        let mut engine = WallpaperEngine::with_description(Config::default(), solar_description());
        engine.set_location(48.8566, 2.3522).unwrap();
        let source = SimulatedTimeSource::until(
            at("2024-04-10T20:00:00+02:00"),
            at("2024-04-11T20:00:00+02:00"),
        );

        let mut anchors = Vec::new();
        while !source.is_ended() {
            let layers = engine.tick(&source).unwrap();
            assert!((0.0..=1.0).contains(&layers.blend));
            let anchor = anchor_date(&engine).unwrap();
            if anchors.last() != Some(&anchor) {
                anchors.push(anchor);
            }

            let delay = engine.next_update_delay(source.now());
            assert!(delay <= StdDuration::from_secs(60));
            // Step a little past a zero delay so the clock keeps moving
            source.sleep(delay.max(StdDuration::from_secs(1)));
        }

        let anchors: Vec<String> = anchors.iter().map(ToString::to_string).collect();
        assert_eq!(anchors, vec!["2024-04-10", "2024-04-11"]);
    }

    /// Changing the offset (daylight saving) rebuilds for the same date
    #[test]
    fn test_daylight_saving_change_rebuilds() {
        let berlin = chrono_tz::Europe::Berlin;
        let before = berlin.with_ymd_and_hms(2024, 3, 31, 1, 30, 0).single().unwrap().fixed_offset();
        let after = berlin.with_ymd_and_hms(2024, 3, 31, 3, 30, 0).single().unwrap().fixed_offset();
        assert_ne!(before.offset(), after.offset());

        let mut engine = WallpaperEngine::with_description(Config::default(), solar_description());
        engine.set_location(52.52, 13.405).unwrap();
        engine.update(before).unwrap();
        assert!(engine.model().unwrap().is_expired(after, engine.coordinate()));

        engine.update(after).unwrap();
        assert_eq!(anchor_date(&engine), Some(after.date_naive()));
        let Some(TimeModel::Solar(model)) = engine.model() else {
            panic!("expected a solar model");
        };
        assert_eq!(model.path().solar_noon.offset(), after.offset());
    }

    /// Moving changes the location the model was built for
    #[test]
    fn test_location_change_rebuilds() {
        let mut engine = WallpaperEngine::with_description(Config::default(), solar_description());
        engine.set_location(48.8566, 2.3522).unwrap();
        let now = at("2024-04-10T12:00:00+02:00");
        engine.update(now).unwrap();

        engine.set_location(40.4168, -3.7038).unwrap();
        assert_eq!(engine.state(), &EngineState::Uninitialized);
        engine.update(now).unwrap();
        let Some(TimeModel::Solar(model)) = engine.model() else {
            panic!("expected a solar model");
        };
        assert_eq!(model.coordinate().latitude(), 40.4168);
    }

    /// Near the pole in polar night the engine fails and keeps failing
    #[test]
    fn test_near_pole_degradation_is_sticky() {
        let mut engine = WallpaperEngine::with_description(Config::default(), solar_description());
        engine.set_location(52.52, 13.405).unwrap();
        let good = engine.update(at("2024-12-21T12:00:00+00:00")).unwrap();

        engine.set_location(89.9, 0.0).unwrap();
        let result = engine.update(at("2024-12-21T12:00:00+00:00"));
        assert!(matches!(
            result,
            Err(EngineError::NearPoleDegeneracy { latitude, .. }) if latitude == 89.9
        ));

        // Same error on every later update, even on another day
        for hours in [1, 6, 30, 24 * 10] {
            let later = at("2024-12-21T12:00:00+00:00") + Duration::hours(hours);
            assert_eq!(engine.update(later), result);
        }
        assert_eq!(engine.last_good(), Some(&good));
        assert_eq!(engine.error(), result.as_ref().err());
    }

    /// Evaluating twice at the same instant gives the same answer
    #[test]
    fn test_update_is_idempotent() {
        let mut engine = WallpaperEngine::with_description(Config::default(), solar_description());
        engine.set_location(-33.8688, 151.2093).unwrap();
        let now = at("2024-07-01T16:45:00+10:00");
        let first = engine.update(now).unwrap();
        let knots = engine.model().unwrap().knots().clone();
        let second = engine.update(now).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.model().unwrap().knots(), &knots);
    }

    /// The delay never crosses the moment the model goes stale
    #[test]
    fn test_next_update_delay_respects_config() {
        let config = Config::from_toml_str("update_interval = 600").unwrap();
        let mut engine = WallpaperEngine::with_description(config, solar_description());
        engine.set_location(48.8566, 2.3522).unwrap();

        let afternoon = at("2024-04-10T15:00:00+02:00");
        engine.update(afternoon).unwrap();
        assert_eq!(engine.next_update_delay(afternoon), StdDuration::from_secs(600));

        let late = at("2024-04-10T23:58:00+02:00");
        engine.update(late).unwrap();
        assert_eq!(engine.next_update_delay(late), StdDuration::from_secs(120));
    }
}
