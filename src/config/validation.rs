//! Configuration validation.

use anyhow::{Context, Result};

use super::{Config, ScheduleMode};
use crate::constants::*;

/// Reject configurations that cannot produce a schedule.
pub fn validate_config(config: &Config) -> Result<()> {
    if let Some(interval) = config.update_interval
        && !(MINIMUM_UPDATE_INTERVAL..=MAXIMUM_UPDATE_INTERVAL).contains(&interval)
    {
        anyhow::bail!(
            "update_interval ({} seconds) must be between {} and {} seconds",
            interval,
            MINIMUM_UPDATE_INTERVAL,
            MAXIMUM_UPDATE_INTERVAL
        );
    }

    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    match config.mode() {
        ScheduleMode::Manual => {
            // Equal times are allowed and collapse the whole cycle onto one instant
            config.sunrise_time().context("Manual mode needs a valid sunrise")?;
            config.sunset_time().context("Manual mode needs a valid sunset")?;
        }
        ScheduleMode::Geo => {
            if config.latitude.is_none() || config.longitude.is_none() {
                anyhow::bail!("Geo mode requires both latitude and longitude");
            }
        }
    }

    Ok(())
}
