//! Implementation of the --simulate command.
//!
//! Installs an accelerated (or fast-forward) clock as the process-wide time source and
//! optionally routes the log to a file, then returns so the caller can run the follower
//! loop as usual. The returned [`SimulationGuards`] must stay alive for the whole run.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::sync::Arc;

use crate::constants::DEFAULT_SIMULATION_MULTIPLIER;
use crate::logger::{Log, LoggerGuard};
use crate::time_source::{self, SimulatedTimeSource};

/// Multiplier value the argument parser uses for `--fast-forward`.
pub const FAST_FORWARD: f64 = -1.0;

/// Resources held for the duration of a simulation.
pub struct SimulationGuards {
    logger_guard: Option<LoggerGuard>,
    log_file: Option<String>,
}

impl SimulationGuards {
    /// Flush the log file (if any) and report where it went.
    pub fn complete_simulation(mut self) {
        if let Some(guard) = self.logger_guard.take() {
            drop(guard);
            if let Some(file) = self.log_file.take() {
                println!("┣ Simulation complete, log written to {file}");
                println!("╹");
            }
        }
    }
}

/// Parsed simulation window and clock speed.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationPlan {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
    /// `None` for fast-forward
    pub multiplier: Option<f64>,
}

impl SimulationPlan {
    /// Validate the command-line values.
    ///
    /// `multiplier` is [`FAST_FORWARD`] for fast-forward, `0.0` for the default speed, or an
    /// explicit speed-up factor.
    pub fn parse(start_time: &str, end_time: &str, multiplier: f64) -> Result<Self> {
        let start = time_source::parse_datetime(start_time)
            .map_err(|e| anyhow::anyhow!("Invalid start time: {}", e))?;
        let end = time_source::parse_datetime(end_time)
            .map_err(|e| anyhow::anyhow!("Invalid end time: {}", e))?;

        if end <= start {
            anyhow::bail!("End time must be after start time");
        }

        let multiplier = if multiplier == FAST_FORWARD {
            None
        } else if multiplier <= 0.0 {
            Some(DEFAULT_SIMULATION_MULTIPLIER)
        } else {
            Some(multiplier)
        };

        Ok(Self {
            start,
            end,
            multiplier,
        })
    }

    /// Value understood by [`SimulatedTimeSource::new`].
    fn time_source_multiplier(&self) -> f64 {
        self.multiplier.unwrap_or(0.0)
    }
}

/// Set up the simulated time source and optional file logging.
pub fn handle_simulate_command(
    start_time: String,
    end_time: String,
    multiplier: f64,
    debug_enabled: bool,
    log_to_file: bool,
) -> Result<SimulationGuards> {
    let plan = SimulationPlan::parse(&start_time, &end_time, multiplier)?;

    // Must happen before any logging so every line carries the simulated timestamp
    time_source::init_time_source(Arc::new(SimulatedTimeSource::new(
        plan.start,
        plan.end,
        plan.time_source_multiplier(),
    )));

    let log_file = log_to_file.then(|| {
        format!(
            "daycycle-simulation-{}.log",
            Local::now().format("%Y%m%d-%H%M%S")
        )
    });

    log_version!();
    log_block_start!("Simulation mode");
    log_decorated!(
        "Simulating from {} to {}",
        plan.start.format("%Y-%m-%d %H:%M:%S"),
        plan.end.format("%Y-%m-%d %H:%M:%S")
    );

    let duration = plan.end - plan.start;
    log_indented!(
        "Total simulated time: {} hours {} minutes",
        duration.num_hours(),
        duration.num_minutes() % 60
    );

    match plan.multiplier {
        None => log_indented!("Time acceleration: fast-forward"),
        Some(multiplier) => log_indented!(
            "Time acceleration: {}x (will complete in ~{:.1} seconds)",
            multiplier,
            duration.num_seconds() as f64 / multiplier
        ),
    }

    if debug_enabled {
        log_pipe!();
        log_debug!("Simulated time source initialized");
    }

    let logger_guard = match &log_file {
        Some(file) => {
            log_block_start!("Writing log to {}", file);
            Some(
                Log::start_file_logging(file.clone())
                    .with_context(|| format!("Failed to start logging to {file}"))?,
            )
        }
        None => None,
    };

    Ok(SimulationGuards {
        logger_guard,
        log_file,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_fast_forward() {
        let plan =
            SimulationPlan::parse("2024-06-10 00:00:00", "2024-06-11 00:00:00", FAST_FORWARD)
                .unwrap();
        assert_eq!(plan.multiplier, None);
        assert_eq!(plan.time_source_multiplier(), 0.0);
    }

    #[test]
    fn test_plan_default_and_explicit_multiplier() {
        let plan =
            SimulationPlan::parse("2024-06-10 00:00:00", "2024-06-11 00:00:00", 0.0).unwrap();
        assert_eq!(plan.multiplier, Some(DEFAULT_SIMULATION_MULTIPLIER));

        let plan =
            SimulationPlan::parse("2024-06-10 00:00:00", "2024-06-11 00:00:00", 60.0).unwrap();
        assert_eq!(plan.multiplier, Some(60.0));
    }

    #[test]
    fn test_plan_rejects_reversed_window() {
        assert!(SimulationPlan::parse("2024-06-11 00:00:00", "2024-06-10 00:00:00", 0.0).is_err());
        assert!(SimulationPlan::parse("2024-06-10 00:00:00", "2024-06-10 00:00:00", 0.0).is_err());
    }

    #[test]
    fn test_plan_rejects_bad_format() {
        assert!(SimulationPlan::parse("2024-06-10", "2024-06-11 00:00:00", 0.0).is_err());
    }
}
