//! Status command - show where an instant falls in today's cycle.
//!
//! Computes the position once from the configured daylight source and prints it together
//! with the full schedule, either human-readable or as JSON.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

use crate::config::{self, Config};
use crate::daylight::DaylightSource;
use crate::logger::Log;
use crate::schedule::{Checkpoint, Schedule, Slot, get_current_position};
use crate::time_source;
use crate::utils::{format_duration, format_local_time};

/// Snapshot printed by the status command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub now: DateTime<Utc>,
    pub mode: &'static str,
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
    pub current_checkpoint: Checkpoint,
    pub next_checkpoint: Checkpoint,
    pub seconds_until_next: i64,
    pub schedule: Vec<Slot>,
}

impl StatusReport {
    /// Build the report for `now` using the given configuration.
    pub fn compute(config: &Config, now: DateTime<Local>) -> Result<Self> {
        let source = DaylightSource::from_config(config)?;
        let times = source.times_for(now)?;
        let now_utc = now.with_timezone(&Utc);

        let schedule = Schedule::build(times.sunrise, times.sunset, now_utc)
            .with_context(|| format!("{now} is outside the supported time range"))?;
        let position = get_current_position(times.sunrise, times.sunset, now_utc);

        Ok(Self {
            now: now_utc,
            mode: config.mode().as_str(),
            sunrise: times.sunrise,
            sunset: times.sunset,
            current_checkpoint: position.current_checkpoint,
            next_checkpoint: position.next_checkpoint,
            seconds_until_next: position.time_until_next.num_seconds(),
            schedule: schedule.slots().to_vec(),
        })
    }
}

/// Handle the status command.
///
/// # Arguments
/// * `json` - Output in JSON format
/// * `at` - Optional "YYYY-MM-DD HH:MM:SS" local time to evaluate instead of now
pub fn handle_status_command(json: bool, at: Option<&str>) -> Result<()> {
    // Keep JSON output machine-readable
    if json {
        Log::set_enabled(false);
    }

    let now = match at {
        Some(s) => time_source::parse_datetime(s).map_err(|e| anyhow::anyhow!("{}", e))?,
        None => time_source::now(),
    };

    let (config, _) = config::load().context("Configuration failed")?;
    let report = StatusReport::compute(&config, now)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        display_human_readable(&report);
    }
    Ok(())
}

fn display_human_readable(report: &StatusReport) {
    log_version!();
    log_block_start!(
        "Current checkpoint: {} {}",
        report.current_checkpoint.display_name(),
        report.current_checkpoint.symbol()
    );
    log_indented!(
        "Next: {} in {}",
        report.next_checkpoint.display_name(),
        format_duration(chrono::Duration::seconds(report.seconds_until_next))
    );

    log_block_start!("Schedule ({} mode):", report.mode);
    for slot in &report.schedule {
        let marker = if slot.checkpoint == report.current_checkpoint {
            " ◀"
        } else {
            ""
        };
        log_indented!(
            "{:<14} {}{}",
            slot.checkpoint.display_name(),
            format_local_time(slot.time),
            marker
        );
    }
    log_end!();
}

/// Display help for the status command.
pub fn display_help() {
    log_version!();
    log_block_start!("status - Show the current checkpoint and today's schedule");
    log_block_start!("Usage: daycycle status [OPTIONS]");
    log_block_start!("Options:");
    log_indented!("--json                 Output as JSON");
    log_indented!("--at <datetime>        Evaluate \"YYYY-MM-DD HH:MM:SS\" instead of now");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScheduleMode;
    use crate::time_source::parse_datetime;

    fn manual_config() -> Config {
        Config {
            mode: Some(ScheduleMode::Manual),
            sunrise: Some("06:00:00".to_string()),
            sunset: Some("18:00:00".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_report_in_the_morning() {
        let now = parse_datetime("2024-06-10 12:00:00").unwrap();
        let report = StatusReport::compute(&manual_config(), now).unwrap();

        assert_eq!(report.mode, "manual");
        assert_eq!(report.current_checkpoint, Checkpoint::Morning);
        assert_eq!(report.next_checkpoint, Checkpoint::LateAfternoon);
        assert_eq!(report.seconds_until_next, 4 * 3600);
        assert_eq!(report.schedule.len(), 4);
        assert_eq!(report.schedule[0].checkpoint, Checkpoint::Sunrise);
    }

    #[test]
    fn test_report_before_sunrise_uses_previous_cycle() {
        let now = parse_datetime("2024-06-10 03:00:00").unwrap();
        let report = StatusReport::compute(&manual_config(), now).unwrap();

        assert_eq!(report.current_checkpoint, Checkpoint::Sunset);
        assert_eq!(report.next_checkpoint, Checkpoint::Sunrise);
        assert_eq!(report.seconds_until_next, 3 * 3600);
        // The schedule starts at yesterday's sunrise
        assert!(report.schedule[0].time < report.now);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let now = parse_datetime("2024-06-10 17:00:00").unwrap();
        let report = StatusReport::compute(&manual_config(), now).unwrap();

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["current_checkpoint"], "late_afternoon");
        assert_eq!(value["next_checkpoint"], "sunset");
        assert_eq!(value["seconds_until_next"], 3600);
        assert_eq!(value["schedule"].as_array().unwrap().len(), 4);
        assert_eq!(value["schedule"][3]["checkpoint"], "sunset");
    }
}
