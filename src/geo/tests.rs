#[cfg(test)]
mod path_tests {
    use crate::config::Config;
    use crate::geo::path::local_midnight;
    use crate::geo::*;
    use chrono::{FixedOffset, NaiveDate, Timelike};

    fn sampler(latitude: f64, longitude: f64) -> SolarPathSampler {
        SolarPathSampler::new(
            Coordinate::new(latitude, longitude).unwrap(),
            &Config::default(),
        )
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    /// Events of a mid-latitude day come in chronological order.
    #[test]
    fn test_events_are_ordered_at_mid_latitude() {
        let path = sampler(51.0, 0.0).sample(date(2024, 3, 20), utc());

        let events: Vec<_> = SolarEvent::ALL
            .iter()
            .map(|event| path.event(*event).expect("every event happens at 51°N"))
            .collect();
        for pair in events.windows(2) {
            assert!(pair[0] < pair[1], "{:?} should precede {:?}", pair[0], pair[1]);
        }
        assert!(path.midnight < path.next_midnight);
        assert!(path.has_sunrise_and_sunset());
    }

    /// Equinox sunrise and sunset at Greenwich land around 06:00 and 18:15 UTC.
    #[test]
    fn test_equinox_times_at_greenwich() {
        let path = sampler(51.0, 0.0).sample(date(2024, 3, 20), utc());
        let sunrise = path.sunrise.unwrap();
        let sunset = path.sunset.unwrap();
        let noon = path.solar_noon;

        assert_eq!(sunrise.hour(), 6);
        assert!(sunset.hour() == 18);
        assert_eq!(noon.hour(), 12);
        assert!(noon.minute() >= 5 && noon.minute() <= 9, "noon at {noon}");
    }

    /// Crossing instants sit on their threshold.
    #[test]
    fn test_crossings_hit_thresholds() {
        let sampler = sampler(40.7128, -74.0060);
        let offset = FixedOffset::west_opt(4 * 3600).unwrap();
        let path = sampler.sample(date(2024, 6, 21), offset);

        let check = |instant: Option<chrono::DateTime<FixedOffset>>, expected: f64| {
            let elevation = sampler.elevation_at(instant.unwrap());
            assert!(
                (elevation - expected).abs() < 0.01,
                "elevation {elevation} should be near {expected}"
            );
        };
        check(path.dawn, -6.0);
        check(path.sunrise, 0.0);
        check(path.morning_golden_hour_end, 6.0);
        check(path.evening_golden_hour_start, 6.0);
        check(path.sunset, 0.0);
        check(path.dusk, -6.0);
    }

    /// Solar noon is the highest point and midnight the lowest.
    #[test]
    fn test_noon_and_midnight_are_extrema() {
        let sampler = sampler(35.6762, 139.6503);
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let path = sampler.sample(date(2024, 11, 3), offset);

        for minutes in [-30i64, -5, 5, 30] {
            let shift = chrono::Duration::minutes(minutes);
            assert!(sampler.elevation_at(path.solar_noon + shift) < path.noon_elevation);
            assert!(sampler.elevation_at(path.midnight + shift) > path.midnight_elevation);
        }
    }

    /// One solar day lasts about 24 hours.
    #[test]
    fn test_cycle_length_close_to_a_day() {
        let path = sampler(-33.9249, 18.4241).sample(date(2024, 12, 22), utc());
        assert!((path.cycle_length() - 86_400.0).abs() < 120.0);
    }

    /// The pole in December never sees the sun.
    #[test]
    fn test_polar_night_reports_absent_events() {
        let path = sampler(89.9, 0.0).sample(date(2024, 12, 21), utc());
        assert!(path.sunrise.is_none());
        assert!(path.sunset.is_none());
        assert!(path.is_polar_night());
        assert!(!path.is_polar_day());
        assert!(!path.has_sunrise_and_sunset());
    }

    /// Svalbard at midsummer never loses the sun.
    #[test]
    fn test_polar_day_reports_absent_events() {
        let path = sampler(78.2, 15.6).sample(date(2024, 6, 21), utc());
        assert!(path.sunrise.is_none());
        assert!(path.sunset.is_none());
        assert!(path.is_polar_day());
        assert!(path.midnight_elevation > 0.0);
    }

    /// White nights: the sun sets but civil twilight never ends.
    #[test]
    fn test_white_night_has_no_dusk() {
        let path = sampler(63.4, 10.4).sample(date(2024, 6, 21), utc());
        assert!(path.has_sunrise_and_sunset());
        assert!(path.dawn.is_none());
        assert!(path.dusk.is_none());
    }

    #[test]
    fn test_local_midnight_respects_offset() {
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        let midnight = local_midnight(date(2024, 5, 1), offset);
        assert_eq!(midnight.naive_local(), date(2024, 5, 1).and_hms_opt(0, 0, 0).unwrap());
        assert_eq!(
            midnight.naive_utc(),
            date(2024, 4, 30).and_hms_opt(22, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_find_crossing_direction_matters() {
        let sampler = sampler(51.0, 0.0);
        let path = sampler.sample(date(2024, 3, 20), utc());
        // The morning half only ever rises
        let falling = sampler.find_crossing(
            path.midnight,
            path.solar_noon,
            0.0,
            CrossingDirection::Falling,
        );
        assert!(falling.is_none());
    }
}

#[cfg(test)]
mod coordinate_tests {
    use crate::error::EngineError;
    use crate::geo::Coordinate;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinate::new(40.7128, -74.0060).is_ok());
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());

        assert_eq!(
            Coordinate::new(91.0, 0.0),
            Err(EngineError::InvalidCoordinate {
                latitude: 91.0,
                longitude: 0.0
            })
        );
        assert!(Coordinate::new(0.0, 181.0).is_err());
        assert!(Coordinate::new(0.0, -360.0).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_deserialized_coordinate_is_validated() {
        let coordinate: Coordinate =
            serde_json::from_str(r#"{"latitude": 52.52, "longitude": 13.405}"#).unwrap();
        assert_eq!(coordinate, Coordinate::new(52.52, 13.405).unwrap());
        assert_eq!(coordinate.latitude(), 52.52);
        assert_eq!(coordinate.longitude(), 13.405);

        let result = serde_json::from_str::<Coordinate>(r#"{"latitude": 95.0, "longitude": 0.0}"#);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("95"), "unexpected error: {err}");

        assert!(toml::from_str::<Coordinate>("latitude = 0.0\nlongitude = 200.0\n").is_err());
    }

    #[test]
    fn test_coordinate_display() {
        let coordinate = Coordinate::new(-33.9249, 18.4241).unwrap();
        assert_eq!(coordinate.to_string(), "33.9249°S, 18.4241°E");
    }
}
