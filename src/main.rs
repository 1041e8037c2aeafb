//! paso CLI
//!
//! Trains every model described in a YAML config with the same train and
//! eval steps.
//!
//! # Usage
//!
//! ```bash
//! # Train from config
//! paso train configs/two_models.yaml
//!
//! # Train with overrides and save histories
//! paso train configs/two_models.yaml --epochs 5 --lr 0.01 --history history.json
//!
//! # Validate config
//! paso validate configs/two_models.yaml --detailed
//!
//! # Show config info
//! paso info configs/two_models.yaml --format yaml
//! ```
//!
//! Library logs go to stderr. `RUST_LOG` overrides the level implied by
//! `--verbose` and `--quiet`.

use clap::Parser;
use paso::cli::{run_command, Cli, LogLevel};
use std::process::ExitCode;

fn setup_logging(level: LogLevel) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(LogLevel::from_flags(cli.quiet, cli.verbose));

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
