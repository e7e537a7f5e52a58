//! Error types for the record-collection crate.

use thiserror::Error;

/// Errors that can occur when building or converting a collection.
///
/// Every fallible operation validates its input before touching the owned
/// records, so an `Err` always leaves the collection as it was.
#[derive(Debug, Error)]
pub enum CollectionError {
    /// Input was not the shape a collection can be built from.
    #[error("invalid input: expected {expected}, got {actual}")]
    InvalidInput {
        expected: &'static str,
        actual: &'static str,
    },

    /// Chunk size must be at least one.
    #[error("invalid chunk size {0}: must be greater than zero")]
    InvalidChunkSize(usize),

    /// A LIKE pattern could not be compiled into a matcher.
    #[error("invalid like pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// JSON encoding or decoding failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for collection operations.
pub type Result<T> = std::result::Result<T, CollectionError>;
