//! Error types for the expensr-core library.

use thiserror::Error;

/// Main error type for the expensr pipeline.
///
/// Parsing degradations are deliberately absent: every extractor and
/// classifier sub-step has a total contract and resolves missing data to
/// documented defaults rather than errors.
#[derive(Error, Debug)]
pub enum ExpensrError {
    /// The caller supplied invalid input (missing required field,
    /// out-of-range parameter). Maps to a 4xx-equivalent status.
    #[error("validation error: {0}")]
    Validation(String),

    /// A storage collaborator failed.
    #[error("storage error: {0}")]
    Store(#[from] expensr_store::StoreError),
}

/// Result type for the expensr library.
pub type Result<T> = std::result::Result<T, ExpensrError>;
