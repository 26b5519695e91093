//! Pending entry types

use cairn_core::{ContentPath, IndexDocument};

/// A complete staged catalog row for one document
#[derive(Debug, Clone, PartialEq)]
pub struct FullEntry {
    /// Document path
    pub path: ContentPath,
    /// Full index document
    pub document: IndexDocument,
    /// Full-text payload, if the document has one
    pub fulltext: Option<String>,
}

impl FullEntry {
    /// Create a full entry
    pub fn new(path: ContentPath, document: IndexDocument, fulltext: Option<String>) -> Self {
        FullEntry {
            path,
            document,
            fulltext,
        }
    }
}

/// The staged state of one document id
///
/// A document id in the buffer is either fully (re)cataloged or
/// tombstoned. Partial patches for ids without a full entry accumulate in
/// the buffer's separate partial map; a patch against an id that already
/// has a [`PendingEntry::Full`] merges into a fresh copy of that entry's
/// document instead (a full entry always absorbs partials).
#[derive(Debug, Clone, PartialEq)]
pub enum PendingEntry {
    /// Replace the document's catalog row wholesale
    Full(FullEntry),
    /// Remove the document from the catalog
    Uncatalog,
}
