//! Lazy result materialization
//!
//! Executing a plan yields only `(id, path)` rows plus the total match
//! count (taken from the same query's window-aggregate column, never a
//! second round trip). The full index documents hydrate in one batch on
//! first access to any handle's extended attribute, through a
//! [`DocumentLoader`] reading from the snapshot that produced the rows.
//!
//! Slicing a result set shares the hydrated batch and preserves the
//! original total.

use cairn_core::{ContentPath, DocId, DocumentLoader, IndexDocument, Result, ResultRow};
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

/// Shared hydrate-once document batch
struct LazyBatch {
    loader: Arc<dyn DocumentLoader>,
    ids: Vec<DocId>,
    documents: OnceCell<HashMap<DocId, IndexDocument>>,
}

impl LazyBatch {
    fn documents(&self) -> Result<&HashMap<DocId, IndexDocument>> {
        self.documents
            .get_or_try_init(|| self.loader.load_documents(&self.ids))
    }
}

/// A materialized result set
///
/// Cheap to clone and slice; all views of one execution share the same
/// lazily hydrated batch and report the same total.
#[derive(Clone)]
pub struct ResultSet {
    rows: Arc<Vec<ResultRow>>,
    range: Range<usize>,
    total: u64,
    batch: Arc<LazyBatch>,
}

impl ResultSet {
    /// Wrap executed rows
    ///
    /// `total` is the untruncated match count the executor read from the
    /// plan's aggregate column; when no limit truncated the query it
    /// equals `rows.len()`.
    pub fn new(rows: Vec<ResultRow>, total: u64, loader: Arc<dyn DocumentLoader>) -> Self {
        let ids: Vec<DocId> = rows.iter().map(|r| r.id).collect();
        let len = rows.len();
        ResultSet {
            rows: Arc::new(rows),
            range: 0..len,
            total,
            batch: Arc::new(LazyBatch {
                loader,
                ids,
                documents: OnceCell::new(),
            }),
        }
    }

    /// Number of rows in this view
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Whether this view holds no rows
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// Total match count before any limit truncated the results
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The handle at a view-relative position
    pub fn get(&self, position: usize) -> Option<ResultHandle> {
        let index = self.range.start.checked_add(position)?;
        if index >= self.range.end {
            return None;
        }
        Some(ResultHandle {
            row: self.rows[index].clone(),
            batch: Arc::clone(&self.batch),
        })
    }

    /// Iterate over this view's handles
    pub fn iter(&self) -> impl Iterator<Item = ResultHandle> + '_ {
        self.range.clone().map(move |index| ResultHandle {
            row: self.rows[index].clone(),
            batch: Arc::clone(&self.batch),
        })
    }

    /// A sub-view over view-relative positions
    ///
    /// Out-of-bounds ends clamp. The slice shares the hydrated batch and
    /// keeps the original total.
    pub fn slice(&self, range: Range<usize>) -> ResultSet {
        let start = (self.range.start + range.start).min(self.range.end);
        let end = (self.range.start + range.end).min(self.range.end);
        ResultSet {
            rows: Arc::clone(&self.rows),
            range: start..end.max(start),
            total: self.total,
            batch: Arc::clone(&self.batch),
        }
    }
}

/// A single match: id and path, with lazy access to the index document
#[derive(Clone)]
pub struct ResultHandle {
    row: ResultRow,
    batch: Arc<LazyBatch>,
}

impl ResultHandle {
    /// Document id
    pub fn id(&self) -> DocId {
        self.row.id
    }

    /// Document path
    pub fn path(&self) -> &ContentPath {
        &self.row.path
    }

    /// One extended attribute from the index document
    ///
    /// The first call on any handle of the set triggers the single batch
    /// load; later calls are lookups. Returns `None` for an unknown key
    /// or a document that vanished between match and hydration.
    ///
    /// # Errors
    ///
    /// Returns an error if the batch load fails.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let documents = self.batch.documents()?;
        Ok(documents
            .get(&self.row.id)
            .and_then(|doc| doc.get(key))
            .cloned())
    }

    /// The full index document, if it hydrated
    ///
    /// # Errors
    ///
    /// Returns an error if the batch load fails.
    pub fn document(&self) -> Result<Option<IndexDocument>> {
        let documents = self.batch.documents()?;
        Ok(documents.get(&self.row.id).cloned())
    }
}

// ============================================================================
// Tests
// ============================================================================
