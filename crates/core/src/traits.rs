//! Consumed collaborator ports
//!
//! The catalog layer compiles plans and stages writes; it never touches
//! physical storage itself. These traits are the seams the surrounding
//! service implements:
//! - [`IndexStore`]: transactional write/savepoint port driven by the
//!   pending buffer's flush/commit/abort
//! - [`DocumentLoader`]: batched index-document hydration for result sets
//! - [`StoreProbe`]: capability probe used by ranking-backend detection
//!
//! Implementations may block on network I/O; cancellation and retry policy
//! belong to the enclosing transaction, not to this layer.

use crate::contract::ContentPath;
use crate::error::Result;
use crate::types::{DocId, IndexDocument};
use std::collections::HashMap;

/// One staged catalog mutation, as applied to the backing store
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Replace the document's index row wholesale
    Upsert {
        /// Document id
        id: DocId,
        /// Document path
        path: ContentPath,
        /// Full index document
        document: IndexDocument,
        /// Full-text payload, if the document has one
        fulltext: Option<String>,
    },
    /// Merge a patch into the document's existing index document
    MergeDocument {
        /// Document id
        id: DocId,
        /// Keys to overwrite
        patch: IndexDocument,
    },
    /// Remove the document from the catalog
    Remove {
        /// Document id
        id: DocId,
    },
}

impl WriteOp {
    /// The document id this operation targets
    pub fn id(&self) -> DocId {
        match self {
            WriteOp::Upsert { id, .. } => *id,
            WriteOp::MergeDocument { id, .. } => *id,
            WriteOp::Remove { id } => *id,
        }
    }
}

/// Transactional write port for the pending buffer
///
/// The implementation wraps the enclosing store transaction. Savepoints
/// are named and nested; `rollback_to` must be idempotent for a name that
/// was already rolled back or released (the buffer calls it from cleanup
/// paths).
pub trait IndexStore {
    /// Whether a catalog row already exists for this id
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn has_row(&mut self, id: DocId) -> Result<bool>;

    /// Open a named nested savepoint
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn savepoint(&mut self, name: &str) -> Result<()>;

    /// Roll back to a named savepoint, discarding writes made after it
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn rollback_to(&mut self, name: &str) -> Result<()>;

    /// Release a named savepoint, keeping writes made after it
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn release(&mut self, name: &str) -> Result<()>;

    /// Apply staged mutations inside the current (save)point
    ///
    /// # Errors
    ///
    /// Returns an error if any mutation fails; the caller decides whether
    /// to roll back.
    fn apply(&mut self, ops: &[WriteOp]) -> Result<()>;
}

/// Batched index-document hydration for result materialization
///
/// Implementations must read from the same snapshot that produced the
/// result rows, so hydrated documents are consistent with the match.
pub trait DocumentLoader {
    /// Load the index documents for a batch of ids
    ///
    /// Ids with no row are simply absent from the returned map.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    fn load_documents(&self, ids: &[DocId]) -> Result<HashMap<DocId, IndexDocument>>;
}

/// Capability probe for ranking-backend detection
///
/// Called once at startup; any error is treated as "capability absent"
/// and detection falls back to the baseline backend.
pub trait StoreProbe {
    /// Whether the store supports the enhanced text-search capability
    ///
    /// # Errors
    ///
    /// Returns an error if probing fails; detection treats this as absent.
    fn supports_text_search(&self) -> Result<bool>;
}
