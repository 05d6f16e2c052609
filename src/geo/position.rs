//! Position of the sun for an instant and a place.
//!
//! Uses the low-precision NOAA formulation: the instant is reduced to Julian
//! centuries since J2000.0, the sun's apparent ecliptic longitude and the
//! equation of time are derived from the mean orbital elements, and the
//! elevation/azimuth follow from declination, hour angle and observer latitude.
//! Accuracy is well below one degree, which is plenty to drive a fade.

use chrono::{DateTime, TimeZone, Timelike, Utc};

use super::Coordinate;

const J2000: f64 = 2_451_545.0;
const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;
const DAYS_PER_JULIAN_CENTURY: f64 = 36_525.0;

/// Elevation and azimuth of the sun, in degrees.
///
/// The elevation is the apparent angle above the horizon (negative below it)
/// including atmospheric refraction. The azimuth is a compass bearing where
/// 0° is north, 90° east, 180° south and 270° west.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub elevation: f64,
    pub azimuth: f64,
}

impl SolarPosition {
    /// Compute the position of the sun at `instant` as seen from `coordinate`.
    pub fn at<Tz: TimeZone>(instant: &DateTime<Tz>, coordinate: Coordinate) -> Self {
        let jcent = julian_century(julian_day(instant));
        let utc = instant.with_timezone(&Utc);
        let minutes_from_midnight = utc.num_seconds_from_midnight() as f64 / 60.0
            + f64::from(utc.nanosecond()) / 60_000_000_000.0;

        let declination = solar_declination(jcent);
        let hour_angle = hour_angle(jcent, minutes_from_midnight, coordinate.longitude());
        let latitude = coordinate.latitude().to_radians();

        let cos_zenith = latitude.sin() * declination.sin()
            + latitude.cos() * declination.cos() * hour_angle.to_radians().cos();
        let geometric_elevation = 90.0 - cos_zenith.clamp(-1.0, 1.0).acos().to_degrees();
        let elevation = (geometric_elevation
            + atmospheric_refraction(geometric_elevation))
        .clamp(-90.0, 90.0);

        Self {
            elevation,
            azimuth: solar_azimuth(latitude, declination, hour_angle),
        }
    }

}

/// Julian day number (with fraction) of an instant.
pub fn julian_day<Tz: TimeZone>(instant: &DateTime<Tz>) -> f64 {
    let seconds =
        instant.timestamp() as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1e9;
    seconds / 86_400.0 + UNIX_EPOCH_JULIAN_DAY
}

fn julian_century(julian_day: f64) -> f64 {
    (julian_day - J2000) / DAYS_PER_JULIAN_CENTURY
}

fn eccentricity_earth_orbit(jcent: f64) -> f64 {
    0.016708634 - jcent * (0.000042037 + 0.0000001267 * jcent)
}

/// Geometric mean anomaly of the sun, in radians.
fn mean_anomaly(jcent: f64) -> f64 {
    (357.52911 + jcent * (35999.05029 - 0.0001537 * jcent)).to_radians()
}

/// Geometric mean longitude of the sun, in radians.
fn mean_longitude(jcent: f64) -> f64 {
    (280.46646 + jcent * (36000.76983 + jcent * 0.0003032))
        .rem_euclid(360.0)
        .to_radians()
}

fn mean_ecliptic_obliquity(jcent: f64) -> f64 {
    let seconds = 21.448 - jcent * (46.815 + jcent * (0.00059 - jcent * 0.001813));
    23.0 + (26.0 + seconds / 60.0) / 60.0
}

/// Longitude of the ascending node of the moon, in radians.
fn lunar_node(jcent: f64) -> f64 {
    (125.04 - jcent * 1934.136).to_radians()
}

/// Corrected obliquity of the ecliptic, in radians.
fn obliquity_correction(jcent: f64) -> f64 {
    (mean_ecliptic_obliquity(jcent) + 0.00256 * lunar_node(jcent).cos()).to_radians()
}

fn equation_of_center(jcent: f64) -> f64 {
    let m = mean_anomaly(jcent);
    let degrees = (2.0 * m).sin() * (0.019993 - jcent * 0.000101)
        + m.sin() * (1.914602 - jcent * (0.004817 + jcent * 0.000014))
        + (3.0 * m).sin() * 0.000289;
    degrees.to_radians()
}

fn apparent_longitude(jcent: f64) -> f64 {
    let correction = (-0.00569 - 0.00478 * lunar_node(jcent).sin()).to_radians();
    mean_longitude(jcent) + equation_of_center(jcent) + correction
}

/// Declination of the sun, in radians.
pub fn solar_declination(jcent: f64) -> f64 {
    (obliquity_correction(jcent).sin() * apparent_longitude(jcent).sin()).asin()
}

/// Equation of time, in minutes.
pub fn equation_of_time(jcent: f64) -> f64 {
    let e = eccentricity_earth_orbit(jcent);
    let m = mean_anomaly(jcent);
    let l = mean_longitude(jcent);
    let y = (0.5 * obliquity_correction(jcent)).tan().powi(2);

    let radians = y * (2.0 * l).sin() - 2.0 * e * m.sin()
        + 4.0 * e * y * m.sin() * (2.0 * l).cos()
        - 0.5 * y * y * (4.0 * l).sin()
        - 1.25 * e * e * (2.0 * m).sin();
    4.0 * radians.to_degrees()
}

/// Hour angle in degrees, within [-180, 180). Zero at solar noon.
fn hour_angle(jcent: f64, minutes_from_utc_midnight: f64, longitude: f64) -> f64 {
    let true_solar_minutes = minutes_from_utc_midnight + equation_of_time(jcent) + 4.0 * longitude;
    (true_solar_minutes / 4.0).rem_euclid(360.0) - 180.0
}

/// Azimuth in degrees within [0, 360), measured clockwise from north.
///
/// The atan2 form stays defined at the poles, where the bearing degenerates to
/// a function of the hour angle alone.
fn solar_azimuth(latitude: f64, declination: f64, hour_angle: f64) -> f64 {
    let hour_angle = hour_angle.to_radians();
    let y = hour_angle.sin();
    let x = hour_angle.cos() * latitude.sin() - declination.tan() * latitude.cos();
    let azimuth = (y.atan2(x).to_degrees() + 180.0).rem_euclid(360.0);
    if azimuth >= 360.0 { 0.0 } else { azimuth }
}

/// Refraction correction in degrees for a geometric elevation in degrees.
fn atmospheric_refraction(elevation: f64) -> f64 {
    if elevation > 85.0 {
        return 0.0;
    }
    let te = elevation.to_radians().tan();
    let arc_seconds = if elevation > 5.0 {
        58.1 / te - 0.07 / te.powi(3) + 0.000086 / te.powi(5)
    } else if elevation > -0.575 {
        1735.0
            + elevation
                * (-518.2 + elevation * (103.4 + elevation * (-12.79 + elevation * 0.711)))
    } else {
        -20.774 / te
    };
    arc_seconds / 3600.0
}
