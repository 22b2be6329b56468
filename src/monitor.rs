//! Follower loop that keeps track of the current checkpoint.
//!
//! Each tick recomputes today's sunrise and sunset, locates "now" in the schedule and
//! announces any checkpoint change. The loop then waits until the next checkpoint is due,
//! but never longer than the configured update interval, so clock changes and suspends are
//! noticed within one interval. Nothing is cached between ticks.

use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration as StdDuration;

use crate::config::{self, Config};
use crate::daylight::DaylightSource;
use crate::schedule::Position;
use crate::signals::{SignalMessage, SignalState};
use crate::time_source::TimeSource;
use crate::tracker::{CheckpointChange, log_checkpoint_announcement, track_checkpoint_change};
use crate::utils::format_duration;

/// Drives checkpoint tracking from a time source.
pub struct Monitor {
    config: Config,
    config_path: Option<PathBuf>,
    daylight: DaylightSource,
    time_source: Arc<dyn TimeSource>,
    previous: Option<Position>,
    changes: ChangeSummary,
    debug_enabled: bool,
}

/// Running tally of checkpoint changes. Fixed size regardless of how long the loop runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub advances: usize,
    pub unexpected_jumps: usize,
    pub last: Option<CheckpointChange>,
}

impl ChangeSummary {
    fn record(&mut self, change: CheckpointChange) {
        match change {
            CheckpointChange::None => return,
            CheckpointChange::Advanced { .. } => self.advances += 1,
            CheckpointChange::UnexpectedJump { .. } => self.unexpected_jumps += 1,
        }
        self.last = Some(change);
    }
}

impl Monitor {
    pub fn new(config: Config, time_source: Arc<dyn TimeSource>, debug_enabled: bool) -> Result<Self> {
        let daylight = DaylightSource::from_config(&config)?;
        Ok(Self {
            config,
            config_path: None,
            daylight,
            time_source,
            previous: None,
            changes: ChangeSummary::default(),
            debug_enabled,
        })
    }

    /// Remember where the configuration came from so SIGHUP can reload it.
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// Counts of the checkpoint changes observed so far, and the most recent one.
    pub fn changes(&self) -> ChangeSummary {
        self.changes
    }

    /// Position computed by the most recent tick.
    pub fn last_position(&self) -> Option<Position> {
        self.previous
    }

    /// Evaluate the current position once and return how long to wait before the next tick.
    pub fn tick(&mut self) -> Result<StdDuration> {
        let now = self.time_source.now();
        let position = self.daylight.position_at(now)?;

        match self.previous {
            Some(previous) => {
                self.changes
                    .record(track_checkpoint_change(&previous, &position));
            }
            None => log_checkpoint_announcement(&position),
        }
        self.previous = Some(position);

        let wait = sleep_duration(&position, self.config.update_interval());
        if self.debug_enabled {
            log_pipe!();
            log_debug!(
                "{} until {}, next check in {}s",
                format_duration(position.time_until_next),
                position.next_checkpoint.display_name().to_lowercase(),
                wait.as_secs()
            );
        }

        Ok(wait)
    }

    /// Follow checkpoints until shutdown is requested or a simulation ends.
    pub fn run(&mut self, signals: &SignalState) -> Result<()> {
        while signals.is_running() && !self.time_source.is_ended() {
            let wait = self.tick()?;

            match self.wait(wait, signals) {
                Some(SignalMessage::Shutdown) => break,
                Some(SignalMessage::Reload) => self.reload(),
                Some(SignalMessage::Reevaluate) => {
                    if self.debug_enabled {
                        log_pipe!();
                        log_debug!("Re-evaluating position on request");
                    }
                }
                None => {}
            }
        }

        Ok(())
    }

    /// Sleep for `duration`, returning early with any signal message that arrives.
    fn wait(&self, duration: StdDuration, signals: &SignalState) -> Option<SignalMessage> {
        if self.time_source.is_simulated() {
            // The simulated clock scales the sleep itself; poll for signals meanwhile
            let source = self.time_source.clone();
            let sleeper = std::thread::spawn(move || source.sleep(duration));

            loop {
                match signals
                    .signal_receiver
                    .recv_timeout(StdDuration::from_millis(10))
                {
                    Ok(message) => return Some(message),
                    Err(RecvTimeoutError::Timeout) => {
                        if sleeper.is_finished() {
                            return None;
                        }
                    }
                    Err(RecvTimeoutError::Disconnected) => {
                        let _ = sleeper.join();
                        return None;
                    }
                }
            }
        }

        match signals.signal_receiver.recv_timeout(duration) {
            Ok(message) => Some(message),
            Err(_) => None,
        }
    }

    /// Reload the configuration file, keeping the current settings if it is invalid.
    fn reload(&mut self) {
        let Some(path) = self.config_path.clone() else {
            log_pipe!();
            log_warning!("No configuration file to reload");
            return;
        };

        let reloaded = config::load_from_path(&path)
            .and_then(|config| DaylightSource::from_config(&config).map(|d| (config, d)));

        match reloaded {
            Ok((config, daylight)) => {
                self.config = config;
                self.daylight = daylight;
                self.config.log_config(&path);
            }
            Err(e) => {
                log_pipe!();
                log_warning!("Failed to reload configuration: {:#}", e);
                log_indented!("Keeping the previous settings");
            }
        }
    }
}

/// Time to wait after computing `position`: until the next checkpoint, rounded up to a whole
/// second so the wake-up lands on or after it, and capped at `max_interval`.
pub fn sleep_duration(position: &Position, max_interval: StdDuration) -> StdDuration {
    let until_next = position.time_until_next;
    let mut secs = until_next.num_seconds().max(0) as u64;
    if until_next.subsec_nanos() > 0 || secs == 0 {
        secs += 1;
    }
    StdDuration::from_secs(secs).min(max_interval)
}
