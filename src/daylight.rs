//! Daily sunrise and sunset instants fed to the schedule.
//!
//! Manual mode turns configured local times of day into instants on the local date of
//! `now`. Geo mode asks the `sunrise` crate for the astronomical events at the configured
//! coordinates on that date. Either way the schedule only looks at the time of day, so the
//! date just picks which day's solar times are used.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use sunrise::{Coordinates, SolarDay, SolarEvent};

use crate::config::{Config, ScheduleMode};
use crate::constants::MAXIMUM_EFFECTIVE_LATITUDE;
use crate::schedule::{Position, get_current_position};

/// Sunrise and sunset for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaylightTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl DaylightTimes {
    /// Locate `now` within the cycle defined by these times.
    pub fn position_at(&self, now: DateTime<Utc>) -> Position {
        get_current_position(self.sunrise, self.sunset, now)
    }
}

/// Provider of daily sunrise/sunset instants.
#[derive(Debug, Clone, PartialEq)]
pub enum DaylightSource {
    Manual { sunrise: NaiveTime, sunset: NaiveTime },
    Geo { latitude: f64, longitude: f64 },
}

impl DaylightSource {
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.mode() {
            ScheduleMode::Manual => Ok(Self::Manual {
                sunrise: config.sunrise_time()?,
                sunset: config.sunset_time()?,
            }),
            ScheduleMode::Geo => {
                let (Some(latitude), Some(longitude)) = (config.latitude, config.longitude) else {
                    anyhow::bail!("Geo mode requires both latitude and longitude");
                };
                Ok(Self::geo(latitude, longitude))
            }
        }
    }

    /// Geo source with the latitude capped so polar regions still see the sun rise and set.
    pub fn geo(latitude: f64, longitude: f64) -> Self {
        let capped = latitude.clamp(-MAXIMUM_EFFECTIVE_LATITUDE, MAXIMUM_EFFECTIVE_LATITUDE);
        if capped != latitude {
            log_pipe!();
            log_warning!(
                "Latitude {:.4}° is beyond ±{}°, using {:.1}° for solar calculations",
                latitude,
                MAXIMUM_EFFECTIVE_LATITUDE,
                capped
            );
        }
        Self::Geo {
            latitude: capped,
            longitude,
        }
    }

    /// Sunrise and sunset for the local date of `now`.
    pub fn times_for(&self, now: DateTime<Local>) -> Result<DaylightTimes> {
        let date = now.date_naive();
        match self {
            Self::Manual { sunrise, sunset } => Ok(DaylightTimes {
                sunrise: local_instant(date, *sunrise)?,
                sunset: local_instant(date, *sunset)?,
            }),
            Self::Geo {
                latitude,
                longitude,
            } => solar_times(*latitude, *longitude, date),
        }
    }

    /// Position of `now` for this source.
    pub fn position_at(&self, now: DateTime<Local>) -> Result<Position> {
        let times = self.times_for(now)?;
        Ok(times.position_at(now.with_timezone(&Utc)))
    }
}

/// Resolve a local wall-clock time on `date`, taking the earliest instant in a DST overlap
/// and skipping forward past a DST gap.
fn local_instant(date: NaiveDate, time: NaiveTime) -> Result<DateTime<Utc>> {
    let naive = date.and_time(time);
    let resolved = match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let shifted = naive + chrono::Duration::hours(1);
            Local
                .from_local_datetime(&shifted)
                .earliest()
                .with_context(|| format!("Local time {naive} does not exist"))?
        }
    };
    Ok(resolved.with_timezone(&Utc))
}

fn solar_times(latitude: f64, longitude: f64, date: NaiveDate) -> Result<DaylightTimes> {
    let coord = Coordinates::new(latitude, longitude)
        .with_context(|| format!("Invalid coordinates: {latitude}, {longitude}"))?;
    let solar_day = SolarDay::new(coord, date);
    Ok(DaylightTimes {
        sunrise: solar_day.event_time(SolarEvent::Sunrise),
        sunset: solar_day.event_time(SolarEvent::Sunset),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_constants::*;
    use crate::schedule::Checkpoint;
    use chrono::Duration;

    fn time(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M:%S").unwrap()
    }

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_manual_times_use_local_date() {
        let source = DaylightSource::Manual {
            sunrise: time(TEST_STANDARD_SUNRISE),
            sunset: time(TEST_STANDARD_SUNSET),
        };
        let times = source.times_for(noon()).unwrap();

        let sunrise_local = times.sunrise.with_timezone(&Local);
        assert_eq!(sunrise_local.date_naive(), noon().date_naive());
        assert_eq!(sunrise_local.time(), time(TEST_STANDARD_SUNRISE));
        assert_eq!(times.sunset - times.sunrise, Duration::hours(12));
    }

    #[test]
    fn test_manual_position_at_noon() {
        let source = DaylightSource::Manual {
            sunrise: time(TEST_STANDARD_SUNRISE),
            sunset: time(TEST_STANDARD_SUNSET),
        };
        let position = source.position_at(noon()).unwrap();
        assert_eq!(position.current_checkpoint, Checkpoint::Morning);
        assert_eq!(position.next_checkpoint, Checkpoint::LateAfternoon);
        assert_eq!(position.time_until_next, Duration::hours(4));
    }

    #[test]
    fn test_geo_times_are_ordered_within_a_day() {
        let source = DaylightSource::geo(TEST_LATITUDE, TEST_LONGITUDE);
        let times = source.times_for(noon()).unwrap();
        let daylight = times.sunset - times.sunrise;
        // New York in June has roughly 15 hours of daylight
        assert!(daylight > Duration::hours(14) && daylight < Duration::hours(16));
    }

    #[test]
    fn test_geo_caps_polar_latitude() {
        assert_eq!(
            DaylightSource::geo(78.2, 15.6),
            DaylightSource::Geo {
                latitude: MAXIMUM_EFFECTIVE_LATITUDE,
                longitude: 15.6
            }
        );
        assert_eq!(
            DaylightSource::geo(-89.0, 0.0),
            DaylightSource::Geo {
                latitude: -MAXIMUM_EFFECTIVE_LATITUDE,
                longitude: 0.0
            }
        );
    }

    #[test]
    fn test_from_config_geo_without_coordinates_fails() {
        let config = Config {
            mode: Some(ScheduleMode::Geo),
            latitude: Some(TEST_LATITUDE),
            ..Default::default()
        };
        assert!(DaylightSource::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_manual_defaults() {
        let source = DaylightSource::from_config(&Config::default()).unwrap();
        assert_eq!(
            source,
            DaylightSource::Manual {
                sunrise: time(TEST_STANDARD_SUNRISE),
                sunset: time(TEST_STANDARD_SUNSET),
            }
        );
    }
}
