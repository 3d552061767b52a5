//! CLI command implementations

use std::io::{self, Write};

use tracing::info;

use crate::http_server::{CircuitServer, ServerConfig, ServerMode};
use crate::logging::init_logging;

use super::args::{Cli, Command, ServeArgs};
use super::errors::{CliError, CliResult};

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbosity());
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(&args),
        Command::CheckConfig(args) => check_config(&args, &mut io::stdout()),
    }
}

/// Load configuration and lay command-line overrides on top
pub fn resolve_config(args: &ServeArgs) -> CliResult<ServerConfig> {
    let mut config = ServerConfig::load(args.config.as_deref())?;
    apply_overrides(&mut config, args);
    config.validate()?;
    Ok(config)
}

fn apply_overrides(config: &mut ServerConfig, args: &ServeArgs) {
    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if args.read_only {
        config.mode = ServerMode::ReadOnly;
    }
    if let Some(url) = &args.database_url {
        config.database_url = Some(url.clone());
    }
    if args.no_seed {
        config.seed = false;
    }
    if let Some(dir) = &args.static_dir {
        config.static_dir = Some(dir.clone());
    }
    if let Some(dir) = &args.upload_dir {
        config.upload_dir = dir.clone();
    }
}

/// Start the HTTP server and block until it stops
pub fn serve(args: &ServeArgs) -> CliResult<()> {
    let config = resolve_config(args)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(CliError::boot("Failed to create tokio runtime"))?;

    rt.block_on(async {
        let server = CircuitServer::from_config(config)?;
        info!(addr = %server.socket_addr(), "starting circuit API");

        server
            .start()
            .await
            .map_err(CliError::boot("HTTP server failed"))
    })
}

/// Write the effective configuration as pretty JSON
pub fn check_config<W: Write>(args: &ServeArgs, out: &mut W) -> CliResult<()> {
    let config = resolve_config(args)?;
    serde_json::to_writer_pretty(&mut *out, &config)?;
    writeln!(out)?;
    Ok(())
}
