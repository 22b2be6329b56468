//! Command-line argument parsing and processing.
//!
//! Supports the `status` subcommand, the `--simulate` flag and the standard help, version,
//! debug and config-directory flags. Unknown options show help instead of running.

use crate::commands::simulate::FAST_FORWARD;
use crate::constants::{MAXIMUM_SIMULATION_MULTIPLIER, MINIMUM_SIMULATION_MULTIPLIER};
use crate::time_source::parse_datetime;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Follow checkpoints on the real clock
    Run {
        debug_enabled: bool,
        config_dir: Option<String>,
    },
    /// Print the position once
    StatusCommand {
        debug_enabled: bool,
        json: bool,
        at: Option<String>,
        config_dir: Option<String>,
    },
    /// Follow checkpoints on a simulated clock
    Simulate {
        debug_enabled: bool,
        start_time: String,
        end_time: String,
        /// `FAST_FORWARD`, `0.0` for the default speed, or an explicit factor
        multiplier: f64,
        log_to_file: bool,
        config_dir: Option<String>,
    },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to invalid arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments (including the program name) into an action.
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        // Help and version take precedence over everything else
        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return ParsedArgs {
                action: CliAction::ShowVersion,
            };
        }
        if args_vec.iter().any(|arg| arg == "--help" || arg == "-h") {
            return ParsedArgs {
                action: CliAction::ShowHelp,
            };
        }

        let action = match find_command(&args_vec) {
            Some(cmd_idx) => parse_command(&args_vec, cmd_idx),
            None => parse_flags(&args_vec),
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Index of the first argument that is neither a flag nor a flag's value.
fn find_command(args_vec: &[String]) -> Option<usize> {
    let mut idx = 0;
    while idx < args_vec.len() {
        let arg = &args_vec[idx];
        if !arg.starts_with('-') {
            return Some(idx);
        }
        match arg.as_str() {
            "--config" | "-c" | "--at" => idx += 2,
            // --simulate consumes a variable number of arguments
            "--simulate" | "-S" => return None,
            _ => idx += 1,
        }
    }
    None
}

fn parse_command(args_vec: &[String], cmd_idx: usize) -> CliAction {
    let command = args_vec[cmd_idx].as_str();
    match command {
        "status" | "s" => parse_status(args_vec, cmd_idx),
        _ => {
            log_warning!("Unknown command: {}", command);
            CliAction::ShowHelpDueToError
        }
    }
}

fn parse_status(args_vec: &[String], cmd_idx: usize) -> CliAction {
    let mut debug_enabled = false;
    let mut json = false;
    let mut at = None;
    let mut config_dir = None;

    let mut i = 0;
    while i < args_vec.len() {
        if i == cmd_idx {
            i += 1;
            continue;
        }

        let arg = args_vec[i].as_str();
        match arg {
            "--debug" | "-d" => debug_enabled = true,
            "--json" => json = true,
            "--config" | "-c" => match args_vec.get(i + 1) {
                Some(dir) if !dir.starts_with('-') => {
                    config_dir = Some(dir.clone());
                    i += 1;
                }
                _ => {
                    log_warning!("Missing directory for --config. Usage: --config <directory>");
                    return CliAction::ShowHelpDueToError;
                }
            },
            "--at" => match args_vec.get(i + 1) {
                Some(value) if parse_datetime(value).is_ok() => {
                    at = Some(value.clone());
                    i += 1;
                }
                Some(value) => {
                    log_error!(
                        "Invalid time for --at: '{}'. Use YYYY-MM-DD HH:MM:SS",
                        value
                    );
                    return CliAction::ShowHelpDueToError;
                }
                None => {
                    log_warning!("Missing value for --at. Usage: --at \"YYYY-MM-DD HH:MM:SS\"");
                    return CliAction::ShowHelpDueToError;
                }
            },
            _ if arg.starts_with('-') => {
                log_warning!("Unknown option: {}", arg);
                return CliAction::ShowHelpDueToError;
            }
            _ => {
                log_error!(
                    "Cannot use multiple commands at once: '{}' and '{}'",
                    args_vec[cmd_idx],
                    arg
                );
                return CliAction::ShowHelpDueToError;
            }
        }
        i += 1;
    }

    CliAction::StatusCommand {
        debug_enabled,
        json,
        at,
        config_dir,
    }
}

fn parse_flags(args_vec: &[String]) -> CliAction {
    let mut debug_enabled = false;
    let mut config_dir: Option<String> = None;
    let mut run_simulate = false;
    let mut simulate_start: Option<String> = None;
    let mut simulate_end: Option<String> = None;
    let mut simulate_multiplier: Option<f64> = None;
    let mut log_to_file = false;
    let mut unknown_arg_found = false;

    let mut i = 0;
    while i < args_vec.len() {
        let arg_str = &args_vec[i];
        match arg_str.as_str() {
            "--debug" | "-d" => debug_enabled = true,
            "--config" | "-c" => {
                // Parse: --config <directory>
                if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                    config_dir = Some(args_vec[i + 1].clone());
                    i += 1;
                } else {
                    log_warning!("Missing directory for --config. Usage: --config <directory>");
                    unknown_arg_found = true;
                }
            }
            "--simulate" | "-S" => {
                run_simulate = true;
                // Parse: --simulate <start_time> <end_time> [multiplier | --fast-forward] [--log]
                if i + 2 < args_vec.len() {
                    let start_str = args_vec[i + 1].clone();
                    let end_str = args_vec[i + 2].clone();
                    i += 2;

                    if parse_datetime(&start_str).is_err() {
                        log_error!(
                            "Invalid start time format: '{}'. Use YYYY-MM-DD HH:MM:SS",
                            start_str
                        );
                        unknown_arg_found = true;
                    } else if parse_datetime(&end_str).is_err() {
                        log_error!(
                            "Invalid end time format: '{}'. Use YYYY-MM-DD HH:MM:SS",
                            end_str
                        );
                        unknown_arg_found = true;
                    } else {
                        simulate_start = Some(start_str);
                        simulate_end = Some(end_str);

                        // Optional multiplier or --fast-forward
                        if let Some(next) = args_vec.get(i + 1) {
                            if next == "--fast-forward" {
                                simulate_multiplier = Some(FAST_FORWARD);
                                i += 1;
                            } else if let Ok(mult) = next.parse::<f64>() {
                                if (MINIMUM_SIMULATION_MULTIPLIER..=MAXIMUM_SIMULATION_MULTIPLIER)
                                    .contains(&mult)
                                {
                                    simulate_multiplier = Some(mult);
                                } else {
                                    log_error!(
                                        "Invalid multiplier: {}. Must be between {} and {}.",
                                        mult,
                                        MINIMUM_SIMULATION_MULTIPLIER,
                                        MAXIMUM_SIMULATION_MULTIPLIER
                                    );
                                    unknown_arg_found = true;
                                }
                                i += 1;
                            }
                        }

                        if args_vec.get(i + 1).is_some_and(|next| next == "--log") {
                            log_to_file = true;
                            i += 1;
                        }
                    }
                } else {
                    log_warning!(
                        "Missing arguments for --simulate. Usage: --simulate \"YYYY-MM-DD HH:MM:SS\" \"YYYY-MM-DD HH:MM:SS\" [multiplier | --fast-forward] [--log]"
                    );
                    unknown_arg_found = true;
                }
            }
            _ => {
                if arg_str.starts_with('-') {
                    log_warning!("Unknown option: {arg_str}");
                    unknown_arg_found = true;
                }
            }
        }
        i += 1;
    }

    if unknown_arg_found {
        return CliAction::ShowHelpDueToError;
    }

    if run_simulate {
        return match (simulate_start, simulate_end) {
            (Some(start_time), Some(end_time)) => CliAction::Simulate {
                debug_enabled,
                start_time,
                end_time,
                multiplier: simulate_multiplier.unwrap_or(0.0),
                log_to_file,
                config_dir,
            },
            _ => {
                log_warning!("Missing start or end time for --simulate");
                CliAction::ShowHelpDueToError
            }
        };
    }

    CliAction::Run {
        debug_enabled,
        config_dir,
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("daycycle [OPTIONS] [COMMAND]");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-d, --debug            Enable detailed debug output");
    log_indented!("-h, --help             Print help information");
    log_indented!("-S, --simulate         Run with simulated time");
    log_indented!("                       Usage: --simulate <start> <end> [multiplier | --fast-forward] [--log]");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("status, s [--json] [--at <datetime>]");
    log_indented!("                       Show the current checkpoint and today's schedule");
    log_block_start!("Without a command daycycle follows checkpoints until interrupted");
    log_end!();
}
