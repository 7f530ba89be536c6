//! Solar time mapping
//!
//! Remaps wall-clock time onto the 0–24 timeline scale so that the real
//! sunrise lands on 06:30 and the real sunset on 18:00, whatever the season
//! or latitude. Each of the three segments (night before sunrise, daylight,
//! night after sunset) is stretched linearly, so the mapping is monotonic and
//! continuous at both anchors.
//!
//! Sunrise/sunset themselves come from a `SunTimesProvider`; the default
//! provider uses `suncalc`.

use crate::palette::{NOMINAL_SUNRISE, NOMINAL_SUNSET};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Timelike};

/// Largest value `solar_time` returns; the scale is half-open [0, 24)
const MAX_SOLAR: f64 = 24.0 - 1e-9;

/// Sunrise and sunset for one day at one coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunTimes {
    pub sunrise: DateTime<Local>,
    pub sunset: DateTime<Local>,
}

/// Source of sunrise/sunset times.
///
/// Returns `None` when the sun does not rise or set that day (polar day or
/// night) or the computation produced nonsense.
pub trait SunTimesProvider: Send + Sync {
    fn sun_times(&self, date: NaiveDate, latitude: f64, longitude: f64) -> Option<SunTimes>;
}

/// `suncalc`-backed provider
#[derive(Debug, Clone, Copy, Default)]
pub struct SuncalcProvider;

impl SunTimesProvider for SuncalcProvider {
    fn sun_times(&self, date: NaiveDate, latitude: f64, longitude: f64) -> Option<SunTimes> {
        // Ask around local noon so the result belongs to `date`
        let noon = date
            .and_hms_opt(12, 0, 0)?
            .and_local_timezone(Local)
            .earliest()?;

        let times = suncalc::get_times(
            suncalc::Timestamp(noon.timestamp_millis()),
            latitude,
            longitude,
            None,
        );

        let sunrise = Local.timestamp_millis_opt(times.sunrise.0).single()?;
        let sunset = Local.timestamp_millis_opt(times.sunset.0).single()?;

        // NaN from polar latitudes comes back as the epoch
        let same_day = |t: &DateTime<Local>| (t.date_naive() - date).num_days().abs() <= 1;
        if !same_day(&sunrise) || !same_day(&sunset) {
            tracing::debug!(
                "No usable sunrise/sunset at ({:.4}, {:.4}) on {}",
                latitude,
                longitude,
                date
            );
            return None;
        }

        Some(SunTimes { sunrise, sunset })
    }
}

/// Fractional hours since local midnight
pub fn hours_since_midnight<Tz: TimeZone>(t: &DateTime<Tz>) -> f64 {
    f64::from(t.hour())
        + f64::from(t.minute()) / 60.0
        + f64::from(t.second()) / 3600.0
        + f64::from(t.nanosecond().min(999_999_999)) / 3_600_000_000_000.0
}

/// Sunrise/sunset in fractional hours, validated
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayAnchors {
    pub sunrise: f64,
    pub sunset: f64,
}

impl DayAnchors {
    /// The anchors the timeline is drawn around; mapping with these is the identity
    pub const NOMINAL: DayAnchors = DayAnchors {
        sunrise: NOMINAL_SUNRISE,
        sunset: NOMINAL_SUNSET,
    };

    /// Use real anchors when they form a sane day, otherwise the nominal ones
    pub fn new(sunrise: f64, sunset: f64) -> Self {
        let sane = sunrise.is_finite()
            && sunset.is_finite()
            && (0.0..=24.0).contains(&sunrise)
            && (0.0..=24.0).contains(&sunset)
            && sunrise < sunset;

        if sane {
            Self { sunrise, sunset }
        } else {
            tracing::debug!(
                "Degenerate sun times (sunrise {}, sunset {}), using nominal day",
                sunrise,
                sunset
            );
            Self::NOMINAL
        }
    }

    pub fn from_sun_times(times: Option<&SunTimes>) -> Self {
        match times {
            Some(t) => Self::new(
                hours_since_midnight(&t.sunrise),
                hours_since_midnight(&t.sunset),
            ),
            None => Self::NOMINAL,
        }
    }
}

/// Linear remap of `value` from one interval onto another.
/// A zero-length (or inverted) source interval yields the target start.
fn remap(value: f64, from: (f64, f64), to: (f64, f64)) -> f64 {
    let span = from.1 - from.0;
    if !(span > 0.0) {
        return to.0;
    }
    let frac = (value - from.0) / span;
    to.0 + frac * (to.1 - to.0)
}

/// Map wall-clock hours onto the timeline scale, in [0, 24).
///
/// - before sunrise: `[0, sunrise]` → `[0, 6.5]`
/// - daylight: `[sunrise, sunset]` → `[6.5, 18]`
/// - after sunset: `[sunset, 24]` → `[18, 24]`
pub fn solar_time(now: f64, sunrise: f64, sunset: f64) -> f64 {
    let solar = if now < sunrise {
        remap(now, (0.0, sunrise), (0.0, NOMINAL_SUNRISE))
    } else if now <= sunset {
        remap(now, (sunrise, sunset), (NOMINAL_SUNRISE, NOMINAL_SUNSET))
    } else {
        remap(now, (sunset, 24.0), (NOMINAL_SUNSET, 24.0))
    };

    if solar.is_nan() {
        return 0.0;
    }
    solar.clamp(0.0, MAX_SOLAR)
}

/// Everything known about "now" at a location
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarReading {
    pub now: DateTime<Local>,
    /// Real sun times, when the provider could compute them
    pub sun_times: Option<SunTimes>,
    pub anchors: DayAnchors,
    /// Position on the timeline scale
    pub solar: f64,
}

impl SolarReading {
    pub fn at(
        now: DateTime<Local>,
        latitude: f64,
        longitude: f64,
        provider: &dyn SunTimesProvider,
    ) -> Self {
        let sun_times = provider.sun_times(now.date_naive(), latitude, longitude);
        let anchors = DayAnchors::from_sun_times(sun_times.as_ref());
        let solar = solar_time(
            hours_since_midnight(&now),
            anchors.sunrise,
            anchors.sunset,
        );

        Self {
            now,
            sun_times,
            anchors,
            solar,
        }
    }
}

/// `HH:MM` for a fractional hour value
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours.rem_euclid(24.0) * 60.0).round() as u32 % (24 * 60);
    format!("{:02}:{:02}", total_minutes / 60, total_minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_nominal_day_is_identity() {
        // 06:30 sunrise, 18:00 sunset: solar time equals clock time
        for now in [0.0, 3.25, 6.5, 9.0, 12.0, 17.99, 18.0, 21.5, 23.9] {
            let solar = solar_time(now, 6.5, 18.0);
            assert!((solar - now).abs() < EPS, "now={} solar={}", now, solar);
        }
    }

    #[test]
    fn test_continuous_at_sunrise() {
        let (sunrise, sunset) = (5.25, 20.75);
        assert_eq!(solar_time(sunrise, sunrise, sunset), NOMINAL_SUNRISE);
        let just_before = solar_time(sunrise - 1e-9, sunrise, sunset);
        assert!((just_before - NOMINAL_SUNRISE).abs() < 1e-6);

        // The pre-sunrise formula evaluated at the boundary agrees
        assert_eq!(
            remap(sunrise, (0.0, sunrise), (0.0, NOMINAL_SUNRISE)),
            NOMINAL_SUNRISE
        );
    }

    #[test]
    fn test_continuous_at_sunset() {
        let (sunrise, sunset) = (7.75, 16.5);
        assert_eq!(solar_time(sunset, sunrise, sunset), NOMINAL_SUNSET);
        let just_after = solar_time(sunset + 1e-9, sunrise, sunset);
        assert!((just_after - NOMINAL_SUNSET).abs() < 1e-6);
        assert_eq!(
            remap(sunset, (sunset, 24.0), (NOMINAL_SUNSET, 24.0)),
            NOMINAL_SUNSET
        );
    }

    #[test]
    fn test_solar_noon_maps_to_midday() {
        // Long summer day: real noon halfway between sunrise and sunset
        let (sunrise, sunset) = (4.5, 21.5);
        let noon = (sunrise + sunset) / 2.0;
        let solar = solar_time(noon, sunrise, sunset);
        assert!((solar - (NOMINAL_SUNRISE + NOMINAL_SUNSET) / 2.0).abs() < EPS);
    }

    #[test]
    fn test_monotonic_over_the_day() {
        let (sunrise, sunset) = (7.9, 16.1);
        let mut last = -1.0;
        for minute in 0..(24 * 60) {
            let solar = solar_time(f64::from(minute) / 60.0, sunrise, sunset);
            assert!(solar >= last, "not monotonic at minute {}", minute);
            assert!((0.0..24.0).contains(&solar));
            last = solar;
        }
    }

    #[test]
    fn test_zero_length_intervals_do_not_produce_nan() {
        // sunrise at midnight, now at midnight
        assert_eq!(solar_time(0.0, 0.0, 18.0), NOMINAL_SUNRISE);
        // sunrise == sunset == now
        assert_eq!(solar_time(12.0, 12.0, 12.0), NOMINAL_SUNRISE);
        // sunset at 24: after-sunset segment is empty but unreachable
        assert!(solar_time(23.0, 6.0, 24.0).is_finite());
    }

    #[test]
    fn test_degenerate_anchors_fall_back_to_nominal() {
        assert_eq!(DayAnchors::new(f64::NAN, 18.0), DayAnchors::NOMINAL);
        assert_eq!(DayAnchors::new(19.0, 5.0), DayAnchors::NOMINAL);
        assert_eq!(DayAnchors::new(-1.0, 5.0), DayAnchors::NOMINAL);
        assert_eq!(DayAnchors::from_sun_times(None), DayAnchors::NOMINAL);
        assert_eq!(
            DayAnchors::new(5.0, 21.0),
            DayAnchors {
                sunrise: 5.0,
                sunset: 21.0
            }
        );
    }

    struct FixedSun {
        sunrise: (u32, u32),
        sunset: (u32, u32),
    }

    impl SunTimesProvider for FixedSun {
        fn sun_times(&self, date: NaiveDate, _lat: f64, _lon: f64) -> Option<SunTimes> {
            let at = |(h, m): (u32, u32)| {
                date.and_hms_opt(h, m, 0)?
                    .and_local_timezone(Local)
                    .earliest()
            };
            Some(SunTimes {
                sunrise: at(self.sunrise)?,
                sunset: at(self.sunset)?,
            })
        }
    }

    #[test]
    fn test_reading_with_nominal_sun_matches_clock() {
        // San Francisco with a mocked 06:30 / 18:00 day
        let provider = FixedSun {
            sunrise: (6, 30),
            sunset: (18, 0),
        };
        let Some(now) = NaiveDate::from_ymd_opt(2024, 3, 20)
            .and_then(|d| d.and_hms_opt(14, 15, 0))
            .and_then(|dt| dt.and_local_timezone(Local).earliest())
        else {
            return; // 14:15 does not exist in this zone
        };

        let reading = SolarReading::at(now, 37.7749, -122.4194, &provider);
        assert!(reading.sun_times.is_some());
        assert!((reading.solar - 14.25).abs() < 1e-9);
    }

    #[test]
    fn test_format_hours() {
        assert_eq!(format_hours(6.5), "06:30");
        assert_eq!(format_hours(18.0), "18:00");
        assert_eq!(format_hours(23.999), "00:00");
        assert_eq!(format_hours(0.0), "00:00");
    }

    #[test]
    fn test_hours_since_midnight() {
        let t = Local
            .with_ymd_and_hms(2024, 6, 1, 13, 45, 36)
            .earliest()
            .map(|t| hours_since_midnight(&t));
        if let Some(hours) = t {
            assert!((hours - 13.76).abs() < 1e-9);
        }
    }
}
