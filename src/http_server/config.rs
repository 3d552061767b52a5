//! Server Configuration
//!
//! Host, port, CORS, persistence backend, serving mode, and upload settings.
//!
//! Sources, later overriding earlier:
//! 1. Built-in defaults
//! 2. JSON config file (if given)
//! 3. `CIRCUITS_*` environment variables
//! 4. Bare `PORT` and `DATABASE_URL` environment variables

use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Json, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::circuit_routes::DEFAULT_MAX_UPLOAD_BYTES;
use crate::store::document::DocumentLocation;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or parsed
    #[error("Failed to load configuration: {0}")]
    Load(Box<figment::Error>),

    /// Values loaded but are not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Load(Box::new(err))
    }
}

/// Whether write routes are mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServerMode {
    #[default]
    ReadWrite,
    /// Only list and get-one are served
    ReadOnly,
}

impl ServerMode {
    pub fn allows_writes(&self) -> bool {
        matches!(self, ServerMode::ReadWrite)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ServerMode::ReadWrite => "read-write",
            ServerMode::ReadOnly => "read-only",
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 3001)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (default: empty, any origin allowed)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Read-write or read-only serving
    #[serde(default)]
    pub mode: ServerMode,

    /// Document store connection string; in-memory store when absent
    #[serde(default)]
    pub database_url: Option<String>,

    /// Seed the in-memory store with the reference circuits
    #[serde(default = "default_seed")]
    pub seed: bool,

    /// Directory of static assets served for non-API paths
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    /// Directory uploaded images are written to
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// URL prefix under which uploaded images are served
    #[serde(default = "default_image_url_prefix")]
    pub image_url_prefix: String,

    /// Largest accepted create/update body, image included (default: 25 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_seed() -> bool {
    true
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("public/images")
}

fn default_image_url_prefix() -> String {
    "/images".to_string()
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            mode: ServerMode::default(),
            database_url: None,
            seed: default_seed(),
            static_dir: None,
            upload_dir: default_upload_dir(),
            image_url_prefix: default_image_url_prefix(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    /// Load from defaults, the optional file, and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::Invalid(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
        }

        let config: ServerConfig = Self::figment(path)
            .merge(Env::prefixed("CIRCUITS_"))
            .merge(Env::raw().only(&["PORT", "DATABASE_URL"]))
            .extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults merged with the optional JSON file
    fn figment(path: Option<&Path>) -> Figment {
        let figment = Figment::from(Serialized::defaults(ServerConfig::default()));
        match path {
            Some(path) => figment.merge(Json::file(path)),
            None => figment,
        }
    }

    /// Reject values the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::Invalid("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be > 0".to_string()));
        }
        if let Some(url) = &self.database_url {
            if DocumentLocation::parse(url).is_none() {
                return Err(ConfigError::Invalid(format!(
                    "Unsupported database_url '{}'. Use 'sqlite::memory:' or 'sqlite://<path>'.",
                    url
                )));
            }
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_upload_bytes must be > 0".to_string(),
            ));
        }
        if !self.image_url_prefix.starts_with('/') {
            return Err(ConfigError::Invalid(
                "image_url_prefix must start with '/'".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
