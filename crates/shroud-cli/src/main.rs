//! `shroud` — command-line front end for the shroud library.
//!
//! Startup sequence:
//! 1. Parse the command line.
//! 2. Load and validate [`Config`] from `SHROUD_*` environment variables.
//! 3. Initialise structured JSON logging on stderr.
//! 4. Run the command; failures print an error document and exit non-zero.

mod cli;
mod commands;
mod config;
mod output;
mod telemetry;

use std::process::ExitCode;

use clap::Parser;
use tracing::error;

use cli::Cli;
use config::Config;
use output::ErrorOutput;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            // Telemetry is not yet up; write to stderr directly.
            eprintln!("ERROR: configuration invalid: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = telemetry::init(&cfg.log_level) {
        eprintln!("ERROR: {e:#}");
        return ExitCode::FAILURE;
    }

    match commands::run(&cli.command, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let out = ErrorOutput::from_error(&e);
            error!(code = %out.code, "command failed");
            if output::print_json(&out).is_err() {
                eprintln!("ERROR: {}", out.message);
            }
            ExitCode::FAILURE
        }
    }
}
