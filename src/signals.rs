//! Unix signal handling for the follower loop.
//!
//! A dedicated thread turns incoming signals into [`SignalMessage`]s:
//! - `SIGINT`/`SIGTERM` stop the loop
//! - `SIGHUP` reloads the configuration
//! - `SIGUSR1` forces an immediate re-evaluation (e.g. after the clock was changed)

use anyhow::{Context, Result};
use signal_hook::{
    consts::signal::{SIGHUP, SIGINT, SIGTERM, SIGUSR1},
    iterator::Signals,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::thread;

/// Messages delivered to the follower loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalMessage {
    /// Stop following (SIGINT, SIGTERM)
    Shutdown,
    /// Reload the configuration file (SIGHUP)
    Reload,
    /// Recompute the position right away (SIGUSR1)
    Reevaluate,
}

/// Signal handling state shared between threads.
pub struct SignalState {
    /// Cleared once a shutdown was requested
    pub running: Arc<AtomicBool>,
    pub signal_receiver: Receiver<SignalMessage>,
    /// Kept so other producers (and tests) can inject messages
    pub signal_sender: Sender<SignalMessage>,
}

impl SignalState {
    /// State that is not connected to any OS signal.
    pub fn new() -> Self {
        let (signal_sender, signal_receiver) = channel();
        Self {
            running: Arc::new(AtomicBool::new(true)),
            signal_receiver,
            signal_sender,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Default for SignalState {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a raw signal number to the message it triggers.
pub fn message_for_signal(signal: i32) -> Option<SignalMessage> {
    match signal {
        SIGINT | SIGTERM => Some(SignalMessage::Shutdown),
        SIGHUP => Some(SignalMessage::Reload),
        SIGUSR1 => Some(SignalMessage::Reevaluate),
        _ => None,
    }
}

/// Register OS signal handlers and return the state the loop listens on.
pub fn setup_signal_handler(debug_enabled: bool) -> Result<SignalState> {
    let state = SignalState::new();
    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP, SIGUSR1])
        .context("failed to register signal handlers")?;

    let running = state.running.clone();
    let sender = state.signal_sender.clone();

    thread::spawn(move || {
        for signal in signals.forever() {
            let Some(message) = message_for_signal(signal) else {
                continue;
            };

            if debug_enabled {
                log_pipe!();
                log_debug!("Received signal {} ({:?})", signal, message);
            }

            if message == SignalMessage::Shutdown {
                running.store(false, Ordering::SeqCst);
            }

            // Receiver gone means the loop already exited
            if sender.send(message).is_err() || message == SignalMessage::Shutdown {
                break;
            }
        }
    });

    Ok(state)
}
