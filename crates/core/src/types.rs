//! Core types for the catalog layer
//!
//! This module defines the foundational types:
//! - DocId: Stable integer identifier for cataloged documents
//! - IndexDocument: Per-document semi-structured map of index values
//! - ResultRow: The (id, path) pair a compiled query yields per match

use crate::contract::ContentPath;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable integer identifier for a document in the backing store
///
/// Document ids are assigned by the store and never change for the
/// lifetime of a document. All catalog state is keyed by them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DocId(i64);

impl DocId {
    /// Wrap a raw store id
    pub fn new(id: i64) -> Self {
        DocId(id)
    }

    /// The raw store id
    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DocId {
    fn from(id: i64) -> Self {
        DocId(id)
    }
}

/// Per-document semi-structured map of computed index values
///
/// Keys are index names; values are whatever the extraction layer computed
/// for them. `serde_json::Map` keeps keys sorted, which gives deterministic
/// serialization and makes snapshot comparisons in the pending buffer
/// byte-for-byte stable.
pub type IndexDocument = serde_json::Map<String, serde_json::Value>;

/// Merge a patch into a base document, returning a fresh copy
///
/// Keys present in the patch overwrite keys in the base; later values win.
/// Neither input is mutated, which is what keeps previously taken buffer
/// snapshots intact.
pub fn merge_document(base: &IndexDocument, patch: &IndexDocument) -> IndexDocument {
    let mut merged = base.clone();
    for (key, value) in patch {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// One row produced by executing a compiled plan
///
/// Carries only the id and path; the full index document hydrates lazily
/// through a [`crate::traits::DocumentLoader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Document id
    pub id: DocId,
    /// Document path
    pub path: ContentPath,
}

impl ResultRow {
    /// Create a result row
    pub fn new(id: DocId, path: ContentPath) -> Self {
        ResultRow { id, path }
    }
}

// ============================================================================
// Tests
// ============================================================================
