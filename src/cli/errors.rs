//! CLI error types
//!
//! Any CLI error ends the process with a non-zero exit code. Each variant
//! carries a stable code that `main` prints ahead of the message.

use std::io;

use thiserror::Error;

use crate::http_server::ConfigError;
use crate::store::StoreError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// Failures surfaced by the `serve` and `check-config` commands
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded or is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Writing to stdout failed
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The effective configuration could not be rendered
    #[error("Failed to encode configuration: {0}")]
    Encode(#[from] serde_json::Error),

    /// The configured store could not be opened
    #[error("Failed to open store: {0}")]
    Store(#[from] StoreError),

    /// The runtime or listener failed
    #[error("{context}: {source}")]
    Boot {
        context: &'static str,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    pub(crate) fn boot(context: &'static str) -> impl FnOnce(io::Error) -> Self {
        move |source| Self::Boot { context, source }
    }

    /// Stable code for the failure class
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CIRCUIT_CLI_CONFIG_ERROR",
            Self::Io(_) | Self::Encode(_) => "CIRCUIT_CLI_IO_ERROR",
            Self::Store(_) | Self::Boot { .. } => "CIRCUIT_CLI_BOOT_FAILED",
        }
    }
}
