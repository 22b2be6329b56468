//! Configuration for daycycle.
//!
//! Settings live in `daycycle.toml` under `$XDG_CONFIG_HOME/daycycle/` unless a custom
//! directory is given with `--config`. A commented default file is written on first use.
//!
//! ```toml
//! #[Schedule]
//! mode = "manual"          # Select: "manual" or "geo"
//! update_interval = 300    # Maximum seconds between re-evaluations (10-3600)
//!
//! #[Manual times]
//! sunrise = "06:00:00"     # Local time of sunrise (HH:MM:SS)
//! sunset = "18:00:00"      # Local time of sunset (HH:MM:SS)
//!
//! #[Geolocation]
//! latitude = 40.7128       # Geographic latitude (-90 to 90)
//! longitude = -74.0060     # Geographic longitude (-180 to 180)
//! ```
//!
//! In manual mode the sunrise and sunset times of day are used as given. In geo mode they
//! are computed from the coordinates for the current date.

pub mod builder;
pub mod loading;
pub mod validation;


use anyhow::{Context, Result};
use chrono::NaiveTime;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration as StdDuration;

use crate::constants::*;

pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Where sunrise and sunset times come from.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleMode {
    /// Fixed times of day from `sunrise`/`sunset`
    Manual,
    /// Solar times computed from `latitude`/`longitude`
    Geo,
}

impl ScheduleMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScheduleMode::Manual => "manual",
            ScheduleMode::Geo => "geo",
        }
    }
}

/// Settings loaded from `daycycle.toml`. Missing fields fall back to defaults.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    pub mode: Option<ScheduleMode>,
    /// Local sunrise time in `HH:MM:SS` (manual mode)
    pub sunrise: Option<String>,
    /// Local sunset time in `HH:MM:SS` (manual mode)
    pub sunset: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Maximum seconds the follower sleeps before re-evaluating
    pub update_interval: Option<u64>,
}

impl Config {
    pub fn mode(&self) -> ScheduleMode {
        self.mode.unwrap_or(ScheduleMode::Manual)
    }

    pub fn sunrise_time(&self) -> Result<NaiveTime> {
        parse_time_of_day(self.sunrise.as_deref().unwrap_or(DEFAULT_SUNRISE))
            .context("Invalid sunrise time format")
    }

    pub fn sunset_time(&self) -> Result<NaiveTime> {
        parse_time_of_day(self.sunset.as_deref().unwrap_or(DEFAULT_SUNSET))
            .context("Invalid sunset time format")
    }

    pub fn update_interval(&self) -> StdDuration {
        StdDuration::from_secs(self.update_interval.unwrap_or(DEFAULT_UPDATE_INTERVAL))
    }

    /// Log a summary of the loaded configuration.
    pub fn log_config(&self, path: &Path) {
        log_block_start!("Loaded configuration");
        log_indented!("File: {}", path.display());
        log_indented!("Mode: {}", self.mode().as_str());

        match self.mode() {
            ScheduleMode::Manual => {
                log_indented!(
                    "Sunrise: {}",
                    self.sunrise.as_deref().unwrap_or(DEFAULT_SUNRISE)
                );
                log_indented!(
                    "Sunset: {}",
                    self.sunset.as_deref().unwrap_or(DEFAULT_SUNSET)
                );
            }
            ScheduleMode::Geo => {
                if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
                    let lat_dir = if lat >= 0.0 { "N" } else { "S" };
                    let lon_dir = if lon >= 0.0 { "E" } else { "W" };
                    log_indented!(
                        "Location: {:.3}°{}, {:.3}°{}",
                        lat.abs(),
                        lat_dir,
                        lon.abs(),
                        lon_dir
                    );
                }
            }
        }

        log_indented!("Update interval: {}s", self.update_interval().as_secs());
    }
}

pub(crate) fn parse_time_of_day(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .with_context(|| format!("'{s}' is not a valid time, expected HH:MM:SS"))
}
