//! Main application entry point.
//!
//! Parses the command line and dispatches to the matching action:
//! - no command: `Daycycle::new(debug_enabled).run()` follows checkpoints on the real clock
//! - `status`: prints the position once
//! - `--simulate`: installs a simulated clock, then runs the follower without headers

use anyhow::Result;

use daycycle::args::{self, CliAction, ParsedArgs};
use daycycle::commands;
use daycycle::config;
use daycycle::constants::EXIT_FAILURE;
use daycycle::time_source;
use daycycle::{Daycycle, log_end, log_error_exit, log_indented};

fn main() {
    if let Err(e) = run(ParsedArgs::from_env().action) {
        log_error_exit!("{}", e);
        for cause in e.chain().skip(1) {
            log_indented!("{}", cause);
        }
        log_end!();
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(action: CliAction) -> Result<()> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::Run {
            debug_enabled,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            Daycycle::new(debug_enabled).run()
        }
        CliAction::StatusCommand {
            debug_enabled: _,
            json,
            at,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::status::handle_status_command(json, at.as_deref())
        }
        CliAction::Simulate {
            debug_enabled,
            start_time,
            end_time,
            multiplier,
            log_to_file,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            let guards = commands::simulate::handle_simulate_command(
                start_time,
                end_time,
                multiplier,
                debug_enabled,
                log_to_file,
            )?;

            // Headers were already shown by the simulate command
            Daycycle::new(debug_enabled).without_headers().run()?;

            if time_source::current().is_ended() {
                guards.complete_simulation();
            }
            Ok(())
        }
    }
}
