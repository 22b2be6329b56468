//! Application coordinator for the follower loop.
//!
//! Loads the configuration, installs the signal handlers and hands control to a
//! [`Monitor`] driven by the process-wide time source.
//!
//! - Normal startup: `Daycycle::new(debug_enabled).run()`
//! - Simulation mode: `Daycycle::new(debug_enabled).without_headers().run()`

use anyhow::{Context, Result};

use crate::config;
use crate::monitor::Monitor;
use crate::signals::setup_signal_handler;
use crate::time_source;

/// Builder for configuring and running the follower.
///
/// # Examples
///
/// ```no_run
/// use daycycle::Daycycle;
///
/// # fn main() -> anyhow::Result<()> {
/// Daycycle::new(false).run()?;
/// # Ok(())
/// # }
/// ```
pub struct Daycycle {
    debug_enabled: bool,
    show_headers: bool,
}

impl Daycycle {
    pub fn new(debug_enabled: bool) -> Self {
        Self {
            debug_enabled,
            show_headers: true,
        }
    }

    /// Skip the version header (the caller already printed one)
    pub fn without_headers(mut self) -> Self {
        self.show_headers = false;
        self
    }

    /// Follow checkpoints until interrupted or until a simulation ends.
    pub fn run(self) -> Result<()> {
        if self.show_headers {
            log_version!();
        }

        let (config, config_path) = config::load().context("Configuration failed")?;
        config.log_config(&config_path);

        let signal_state = setup_signal_handler(self.debug_enabled)?;

        let mut monitor = Monitor::new(config, time_source::current(), self.debug_enabled)
            .context("Failed to initialize daylight source")?
            .with_config_path(config_path);

        monitor.run(&signal_state)?;

        if self.debug_enabled {
            let changes = monitor.changes();
            log_pipe!();
            log_debug!(
                "Observed {} advance(s) and {} unexpected jump(s)",
                changes.advances,
                changes.unexpected_jumps
            );
        }

        log_block_start!("Shutting down daycycle...");
        log_end!();

        Ok(())
    }
}
