//! Error types for the expensr-store crate.

use thiserror::Error;

/// Errors surfaced by store, blob, and cache collaborators.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An insert collided with an existing row. Advisory uniqueness only;
    /// callers retry the lookup once and then tolerate the duplicate.
    #[error("duplicate {entity}: {name}")]
    Duplicate { entity: &'static str, name: String },

    /// A referenced row does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Blob storage failed. Ingestion of a supplied file cannot proceed
    /// without a stored reference.
    #[error("blob storage failed: {0}")]
    Blob(String),

    /// Snapshot (de)serialization error.
    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// I/O error reading or writing a snapshot file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}
