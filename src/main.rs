//! circuit-api entry point
//!
//! Parses arguments, runs the command, and exits non-zero on failure. All
//! logic lives in the CLI module.

use circuit_api::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}: {}", e.code(), e);
        std::process::exit(1);
    }
}
