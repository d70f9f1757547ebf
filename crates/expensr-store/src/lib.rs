//! Collaborator interfaces for the expensr pipeline.
//!
//! This crate defines the logical storage operations the core issues —
//! persistence of documents/vendors/categories/transactions, blob storage
//! for uploaded files, and the forecast result cache — as traits, so the
//! core never talks to a concrete database or object store directly:
//! - `ExpenseStore` for relational reads/writes
//! - `BlobStore` for opaque uploaded-file references
//! - `ForecastCache` for cached forecast series
//!
//! A `MemoryStore` backend implements all three for tests and for the CLI's
//! snapshot-file store.

mod backend;
mod error;
mod filter;
mod record;

pub use backend::memory::MemoryStore;
pub use backend::{content_type_for, BlobStore, ExpenseStore, ForecastCache};
pub use error::StoreError;
pub use filter::{Page, TxFilter};
pub use record::{
    CategoryRow, DocumentRow, StoredForecast, TransactionRow, TransactionView, TxKind,
    UpsertOutcome, VendorRow, MAX_DESCRIPTION_LEN, MAX_NAME_LEN,
};

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
