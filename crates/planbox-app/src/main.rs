//! Planbox command line.
//!
//! Expands repetition rules, revises plan windows and renders calendars as
//! JSON on stdout. Logs go to stderr.

use std::process::ExitCode;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use planbox_core::config::load_config;
use planbox_core::constants::DEFAULT_LOG_LEVEL;
use planbox_core::logging::init_tracing;
use planbox_engine::RuleValidationErrors;
use planbox_service::ServiceError;

mod commands;

use commands::calendar::CalendarCommand;
use commands::generate::GenerateCommand;
use commands::revise::ReviseCommand;

/// Exit code for requests rejected by rule validation.
const VALIDATION_EXIT_CODE: u8 = 2;

#[derive(Parser)]
#[command(
    name = "planbox",
    version,
    about = "Date rules, plan window revisions and calendars",
    after_help = "EXAMPLES:\n  \
                  planbox generate --start 2023-07-18 --end 2023-07-31 --option 3 --value MON --value FRI\n  \
                  planbox revise --old-start 2023-07-18 --old-end 2023-07-25 --new-start 2023-07-18 --new-end 2023-07-29\n  \
                  planbox calendar --input plans.json --start 2023-07-17 --end 2023-07-23"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dates a repetition rule selects inside a window
    Generate(GenerateCommand),

    /// Print how each date is affected by moving a window
    Revise(ReviseCommand),

    /// Print the calendar of a set of plans over a search window
    Calendar(CalendarCommand),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if let Some(errors) = validation_errors(&err) {
                for error in errors {
                    eprintln!("{}: {}", error.field, error.kind);
                }
                ExitCode::from(VALIDATION_EXIT_CODE)
            } else {
                eprintln!("Error: {err:#}");
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let log_filter = init_tracing(DEFAULT_LOG_LEVEL)?;
    let settings = load_config().context("Failed to load configuration")?;
    tracing::debug!(config = ?settings, "Configuration loaded");
    log_filter.apply_level(&settings.logging.level);

    match cli.command {
        Commands::Generate(cmd) => cmd.execute(settings.limits),
        Commands::Revise(cmd) => cmd.execute(settings.limits),
        Commands::Calendar(cmd) => cmd.execute(&settings),
    }
}

/// Rule validation failures carried by `err`, if that is what it is.
fn validation_errors(err: &anyhow::Error) -> Option<&RuleValidationErrors> {
    if let Some(errors) = err.downcast_ref::<RuleValidationErrors>() {
        return Some(errors);
    }
    match err.downcast_ref::<ServiceError>() {
        Some(ServiceError::RuleValidation(errors)) => Some(errors),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use planbox_engine::RuleRequest;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn validation_errors_found_directly_and_through_service_error() {
        let errors = RuleRequest::new(2, ["x"]).validate().expect_err("invalid");

        let direct = anyhow::Error::new(errors.clone());
        assert_eq!(validation_errors(&direct).map(RuleValidationErrors::len), Some(1));

        let wrapped = anyhow::Error::new(ServiceError::RuleValidation(errors)).context("creating group");
        assert!(validation_errors(&wrapped).is_some());

        assert!(validation_errors(&anyhow::anyhow!("other")).is_none());
    }
}
