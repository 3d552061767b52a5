//! # Circuit Store
//!
//! Persistence abstraction for circuits. Handlers are written against
//! [`CircuitStore`]; each backend brings its own id representation.
//!
//! - [`MemoryStore`] keeps an ordered list with sequential integer ids
//! - [`DocumentStore`] keeps JSON documents in SQLite under opaque UUID keys

pub mod document;
pub mod errors;
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::circuit::{Circuit, CircuitFields};

pub use document::DocumentStore;
pub use errors::{StoreError, StoreResult};
pub use memory::MemoryStore;

/// Circuit persistence operations.
///
/// Ids arrive as the raw path segment. A backend that cannot interpret an id
/// treats it as absent.
#[async_trait]
pub trait CircuitStore: Send + Sync + std::fmt::Debug {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// All circuits in insertion order
    async fn list_all(&self) -> StoreResult<Vec<Circuit>>;

    /// The circuit with the given id, if any
    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Circuit>>;

    /// Persist a new circuit. The store assigns the id, derives the slug and
    /// defaults the image when `image_path` is `None`.
    async fn insert(&self, fields: CircuitFields, image_path: Option<String>)
        -> StoreResult<Circuit>;

    /// Replace the writable fields of an existing circuit
    async fn update(
        &self,
        id: &str,
        fields: CircuitFields,
        image_path: Option<String>,
    ) -> StoreResult<Circuit>;

    /// Remove a circuit and return it
    async fn delete(&self, id: &str) -> StoreResult<Circuit>;
}

/// Shared handle to a store
pub type SharedStore = Arc<dyn CircuitStore>;
