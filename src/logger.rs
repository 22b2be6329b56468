//! Structured logging with box-drawing output.
//!
//! Every line is written through [`write_output`], which prints to stdout or, while a
//! [`LoggerGuard`] from [`Log::start_file_logging`] is alive, forwards the text (with ANSI
//! colors stripped) to a writer thread that appends it to a file.
//!
//! ## Conventions
//!
//! - `log_block_start!` opens a new conceptual block (`┃` spacer then `┣ message`).
//! - `log_decorated!` continues the current block (`┣ message`).
//! - `log_indented!` nests details under the previous line (`┃   message`).
//! - `log_pipe!` inserts a bare `┃` before a semantic `log_warning!`/`log_error!`/... line.
//! - `log_version!` prints the startup header and `log_end!` the final `╹`.
//!
//! During a simulation each line is prefixed with the simulated wall-clock time.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

// Routes output to a file when --log is active
static LOG_CHANNEL: OnceLock<Sender<LogMessage>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Namespace for logger state.
pub struct Log;

impl Log {
    /// Enable or disable logging, e.g. to keep machine-readable output clean.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Start routing all log output to `file_path` until the returned guard is dropped.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(tx.clone())
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => {
                        file.write_all(text.as_bytes())?;
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Timestamp prefix shown while running on simulated time, empty otherwise.
    pub fn get_timestamp_prefix() -> String {
        // Checked without initializing the time source
        if crate::time_source::is_initialized() && crate::time_source::is_simulated() {
            format!("[{}] ", crate::time_source::now().format("%H:%M:%S"))
        } else {
            String::new()
        }
    }
}

/// Keeps file logging alive; flushes and joins the writer thread on drop.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Writes already formatted text to the active sink (needed by the macros).
pub fn write_output(text: &str) {
    if let Some(tx) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

// # Logging Macros

#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($template:literal, $($arg:tt)*) => {{
        use $crate::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let message = format!($($arg)*);
            let formatted = format!($template, prefix = prefix, message = message);
            $crate::logger::write_output(&formatted);
        }
    }};
}

/// Log a message that continues the current block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣ {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣ {message}\n", "{}", $expr)
    };
}

/// Log an indented detail line.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┃   {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┃   {message}\n", "{}", $expr)
    };
}

/// Log an empty pipe line for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_line!("{prefix}┃{message}\n", "")
    };
}

/// Log the first line of a new block.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┃\n{prefix}┣ {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┃\n{prefix}┣ {message}\n", "{}", $expr)
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_line!(
            "{prefix}┏ daycycle v{message} ━━╸\n",
            "{}",
            env!("CARGO_PKG_VERSION")
        )
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_line!("{prefix}╹{message}\n", "")
    };
}

/// Log a warning in yellow.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣[\x1b[33mWARNING\x1b[0m] {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣[\x1b[33mWARNING\x1b[0m] {message}\n", "{}", $expr)
    };
}

/// Log an error in red.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣[\x1b[31mERROR\x1b[0m] {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣[\x1b[31mERROR\x1b[0m] {message}\n", "{}", $expr)
    };
}

/// Log an error that terminates the current flow (`┗` corner).
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┃\n{prefix}┗[\x1b[31mERROR\x1b[0m] {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┃\n{prefix}┗[\x1b[31mERROR\x1b[0m] {message}\n", "{}", $expr)
    };
}

/// Log an informational message in green.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣[\x1b[32mINFO\x1b[0m] {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣[\x1b[32mINFO\x1b[0m] {message}\n", "{}", $expr)
    };
}

/// Log a debug message in green.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!("{prefix}┣[\x1b[32mDEBUG\x1b[0m] {message}\n", $fmt $($arg)*)
    };
    ($expr:expr) => {
        $crate::__log_line!("{prefix}┣[\x1b[32mDEBUG\x1b[0m] {message}\n", "{}", $expr)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes() {
        assert_eq!(
            strip_ansi_codes("┣[\x1b[33mWARNING\x1b[0m] careful"),
            "┣[WARNING] careful"
        );
        assert_eq!(strip_ansi_codes("plain ┃ text"), "plain ┃ text");
        assert_eq!(strip_ansi_codes("lone \x1b escape"), "lone \x1b escape");
    }
}
