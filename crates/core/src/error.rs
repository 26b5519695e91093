//! Error types for the catalog layer
//!
//! This module defines the error types shared across the workspace.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Validation errors for the identifier contracts live next to their newtypes
//! in `contract` and convert into `CatalogError` via `From`.

use crate::contract::{ContentPathError, IndexNameError};
use crate::datetime::DateError;
use thiserror::Error;

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Error types for the catalog layer
#[derive(Debug, Error)]
pub enum CatalogError {
    /// An index name or storage key failed identifier validation.
    ///
    /// Unsafe identifiers are a hard failure, never silently sanitized:
    /// validated identifiers are the only text allowed into generated
    /// predicates.
    #[error("unsafe identifier: {0}")]
    UnsafeIdentifier(#[from] IndexNameError),

    /// A document path failed path-grammar validation
    #[error("invalid path: {0}")]
    InvalidPath(#[from] ContentPathError),

    /// A date value could not be normalized
    #[error("invalid date: {0}")]
    InvalidDate(#[from] DateError),

    /// A query value was malformed for the index kind it targets
    #[error("invalid query for index {index}: {reason}")]
    InvalidQuery {
        /// Name of the index the value was supplied for
        index: String,
        /// What was wrong with the value
        reason: String,
    },

    /// A path query supplied more roots than the configured cap
    #[error("too many path roots: {count} (max {max})")]
    TooManyPathRoots {
        /// Number of roots supplied
        count: usize,
        /// Configured maximum
        max: usize,
    },

    /// The backing store reported a failure
    #[error("store error: {0}")]
    Store(String),

    /// The pending buffer was driven through an invalid lifecycle transition
    #[error("invalid buffer state: {0}")]
    InvalidState(String),
}
