//! CLI module for paso
//!
//! Argument parsing, command handlers and output verbosity.

mod args;
mod commands;
mod logging;

pub use args::{Cli, Command, InfoArgs, OutputFormat, TrainArgs, ValidateArgs};
pub use commands::run_command;
pub use logging::LogLevel;
