//! CLI module
//!
//! Provides command-line interface for:
//! - serve: Start the HTTP server
//! - check-config: Print the effective configuration

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command, ServeArgs};
pub use commands::{check_config, resolve_config, run, run_command, serve};
pub use errors::{CliError, CliResult};
