//! CLI argument definitions using clap
//!
//! Commands:
//! - circuit-api serve [--config <path>] [overrides]
//! - circuit-api check-config [--config <path>] [overrides]

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::Verbosity;

/// circuit-api - REST API for racing-circuit metadata
#[derive(Parser, Debug)]
#[command(name = "circuit-api")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Print the effective configuration as JSON and exit
    CheckConfig(ServeArgs),
}

/// Configuration sources and command-line overrides
#[derive(Args, Debug, Clone, Default)]
pub struct ServeArgs {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(long)]
    pub port: Option<u16>,

    /// Serve only the read routes
    #[arg(long)]
    pub read_only: bool,

    /// Document store connection string (sqlite::memory: or sqlite://<path>)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Start the in-memory store empty
    #[arg(long)]
    pub no_seed: bool,

    /// Directory of static assets
    #[arg(long)]
    pub static_dir: Option<PathBuf>,

    /// Directory uploaded images are written to
    #[arg(long)]
    pub upload_dir: Option<PathBuf>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }
}
