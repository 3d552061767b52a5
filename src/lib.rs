//! circuit-api - REST API for racing-circuit metadata
//!
//! CRUD over a single circuit resource, backed by an in-memory list or a
//! SQLite document store, with optional image uploads and a read-only mode.

pub mod circuit;
pub mod cli;
pub mod http_server;
pub mod images;
pub mod logging;
pub mod store;
