//! Low-precision solar ephemeris, good to a fraction of a degree, which is
//! plenty for picking sky colours.

#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::f64::consts::PI;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};

const DAY_MS: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
const OBLIQUITY_DEG: f64 = 23.4397;
const PERIHELION_DEG: f64 = 102.9372;

fn days_since_j2000(at: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let millis = at.timestamp_millis() as f64;
    millis / DAY_MS - 0.5 + J1970 - J2000
}

fn mean_anomaly(days: f64) -> f64 {
    (357.5291 + 0.985_600_28 * days).to_radians()
}

fn ecliptic_longitude(mean_anomaly: f64) -> f64 {
    let center = (1.9148 * mean_anomaly.sin()
        + 0.02 * (2.0 * mean_anomaly).sin()
        + 0.0003 * (3.0 * mean_anomaly).sin())
    .to_radians();
    mean_anomaly + center + PERIHELION_DEG.to_radians() + PI
}

/// Equatorial coordinates of the sun as `(right ascension, declination)`.
fn sun_coords(days: f64) -> (f64, f64) {
    let longitude = ecliptic_longitude(mean_anomaly(days));
    let obliquity = OBLIQUITY_DEG.to_radians();
    let right_ascension = (longitude.sin() * obliquity.cos()).atan2(longitude.cos());
    let declination = (obliquity.sin() * longitude.sin()).asin();
    (right_ascension, declination)
}

fn sidereal_time(days: f64, west_longitude: f64) -> f64 {
    (280.16 + 360.985_623_5 * days).to_radians() - west_longitude
}

/// Altitude of the sun above the horizon, in degrees.
#[must_use]
pub fn solar_altitude_deg(at: DateTime<Utc>, latitude: f64, longitude: f64) -> f64 {
    let days = days_since_j2000(at);
    let (right_ascension, declination) = sun_coords(days);
    let phi = latitude.to_radians();
    let hour_angle = sidereal_time(days, (-longitude).to_radians()) - right_ascension;
    (phi.sin() * declination.sin() + phi.cos() * declination.cos() * hour_angle.cos())
        .asin()
        .to_degrees()
}

/// The instant a simulated time-of-day offset stands for: `date` at
/// `offset_hours` (e.g. `12.5` is 12:30) in `tz`.
///
/// Offsets are wrapped into `0.0..24.0`. Returns `None` for local times
/// that do not exist in `tz` (DST gaps).
#[must_use]
pub fn simulated_instant<Tz: TimeZone>(
    date: NaiveDate,
    offset_hours: f32,
    tz: &Tz,
) -> Option<DateTime<Utc>> {
    let total_minutes = (f64::from(offset_hours.rem_euclid(24.0)) * 60.0).round() as u32;
    let hours = (total_minutes / 60).min(23);
    let minutes = if total_minutes / 60 > 23 {
        59
    } else {
        total_minutes % 60
    };
    let time = NaiveTime::from_hms_opt(hours, minutes, 0)?;
    tz.from_local_datetime(&date.and_time(time))
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Where the sky clock currently points: the real time, or today at the
/// simulated offset in the machine's time zone.
#[must_use]
pub fn effective_instant(now: DateTime<Utc>, simulated_offset: Option<f32>) -> DateTime<Utc> {
    let Some(offset) = simulated_offset else {
        return now;
    };
    let today = now.with_timezone(&Local).date_naive();
    simulated_instant(today, offset, &Local).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use chrono::{Timelike, Utc};

    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0)
            .single()
            .expect("valid fixture time")
    }

    #[test]
    fn equinox_noon_at_the_equator_is_near_zenith() {
        let alt = solar_altitude_deg(utc(2026, 3, 20, 12, 7), 0.0, 0.0);
        assert!(alt > 85.0, "altitude was {alt}");
    }

    #[test]
    fn midnight_at_the_equator_is_deep_night() {
        let alt = solar_altitude_deg(utc(2026, 3, 20, 0, 7), 0.0, 0.0);
        assert!(alt < -60.0, "altitude was {alt}");
    }

    #[test]
    fn paris_winter_noon_sun_stays_low() {
        let alt = solar_altitude_deg(utc(2026, 12, 21, 11, 50), 48.8534, 2.3488);
        assert!((15.0..20.0).contains(&alt), "altitude was {alt}");
    }

    #[test]
    fn longitude_shifts_local_noon() {
        let greenwich = solar_altitude_deg(utc(2026, 6, 1, 12, 0), 0.0, 0.0);
        let far_west = solar_altitude_deg(utc(2026, 6, 1, 12, 0), 0.0, -90.0);
        assert!(greenwich > 60.0);
        assert!(far_west < 10.0);
    }

    #[test]
    fn simulated_offset_splits_hours_and_minutes() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 20).expect("valid date");
        let at = simulated_instant(date, 12.5, &Utc).expect("instant");
        assert_eq!((at.hour(), at.minute()), (12, 30));

        let late = simulated_instant(date, 23.999, &Utc).expect("instant");
        assert_eq!((late.hour(), late.minute()), (23, 59));

        let wrapped = simulated_instant(date, 25.0, &Utc).expect("instant");
        assert_eq!(wrapped.hour(), 1);
    }

    #[test]
    fn simulated_altitude_is_reproducible() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 20).expect("valid date");
        let first = simulated_instant(date, 12.5, &Utc).expect("instant");
        let second = simulated_instant(date, 12.5, &Utc).expect("instant");
        assert_eq!(first, second);
        let a = solar_altitude_deg(first, 0.0, 0.0);
        let b = solar_altitude_deg(second, 0.0, 0.0);
        assert!((a - b).abs() < f64::EPSILON);
    }

    #[test]
    fn live_clock_passes_through_without_offset() {
        let now = utc(2026, 5, 4, 8, 15);
        assert_eq!(effective_instant(now, None), now);
    }
}
