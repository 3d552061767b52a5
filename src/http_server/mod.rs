//! # HTTP Server Module
//!
//! Axum server exposing the circuit API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/circuits` - List and create circuits
//! - `/api/circuits/:id` - Get, update, and delete a circuit
//! - `/images/*` - Uploaded circuit images
//! - anything else - Static assets, when configured

pub mod circuit_routes;
pub mod config;
pub mod errors;
pub mod observability_routes;
pub mod payload;
pub mod server;

pub use circuit_routes::{circuit_routes, CircuitState};
pub use config::{ConfigError, ServerConfig, ServerMode};
pub use errors::{ApiError, ApiResult, NOT_FOUND_MESSAGE};
pub use server::{open_store, CircuitServer};
