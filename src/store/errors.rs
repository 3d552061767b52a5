//! # Store Errors

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Circuit store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No circuit with the given id
    #[error("Circuit not found: {0}")]
    NotFound(String),

    /// The database could not be opened
    #[error("Failed to open document store at {location}: {source}")]
    Open {
        location: String,
        #[source]
        source: rusqlite::Error,
    },

    /// A database statement failed
    #[error("Document store query failed: {0}")]
    Database(#[from] rusqlite::Error),

    /// The database directory could not be created
    #[error("Document store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be encoded or decoded
    #[error("Document encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The blocking task running the operation failed
    #[error("Document store task failed: {0}")]
    Task(String),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}
