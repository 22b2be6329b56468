//! # Daycycle Library
//!
//! Locates an instant within the daily light cycle and follows checkpoint transitions.
//!
//! ## Architecture
//!
//! - **Core**: `schedule` places the four daily checkpoints (sunrise, morning, late
//!   afternoon, sunset) around "now" and reports the current and next checkpoint
//! - **Inputs**: `daylight` supplies sunrise/sunset from fixed times or coordinates,
//!   `config` loads them from TOML
//! - **Runtime**: `monitor` follows transitions on a `time_source` clock, `tracker`
//!   classifies each change, `signals` handles shutdown and reload
//! - **Entry Point**: the `Daycycle` builder, `args` parsing and one-shot `commands`
//! - **Infrastructure**: structured logging and formatting utilities

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod daylight;
pub mod monitor;
pub mod schedule;
pub mod signals;
pub mod time_source;
pub mod tracker;
pub mod utils;

mod daycycle;

pub use daycycle::Daycycle;
pub use schedule::{Checkpoint, Position, Schedule, Slot, get_current_position};
