//! Command-line command handlers for daycycle.
//!
//! Each one-shot command lives in its own submodule.

pub mod simulate;
pub mod status;
