//! The pending write buffer
//!
//! State machine: `Idle -> Joined` (first mutation) `-> [Flushed] ->
//! Committed | RolledBack -> Idle`. One buffer belongs to exactly one
//! transaction; cross-transaction visibility is the backing store's
//! isolation level, not ours.
//!
//! ## Flush semantics
//!
//! `flush` makes staged writes visible to later reads *in the same
//! transaction* by applying them inside a named nested savepoint of the
//! backing transaction. Re-flushing after further mutations rolls the
//! previous speculative savepoint back first, then reapplies from the
//! current pending state, so the store never holds a half-applied mix of
//! generations. A flush with an unchanged generation counter is a no-op.
//!
//! If any pending id has no existing storage row yet, the whole
//! generation defers to commit instead: an insert inside a speculative
//! savepoint could otherwise surface a half-written row to readers.

use crate::entry::{FullEntry, PendingEntry};
use cairn_core::{merge_document, DocId, IndexDocument, IndexStore, Result, WriteOp};
use std::collections::HashMap;
use tracing::debug;

/// Lifecycle state of a pending buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferState {
    /// No staged mutations
    Idle,
    /// Enrolled in the enclosing transaction by a first mutation
    Joined,
    /// Staged mutations have been speculatively applied
    Flushed,
    /// Terminal: written through at transaction commit
    Committed,
    /// Terminal: discarded at transaction abort
    RolledBack,
}

/// Point-in-time copy of the buffer's staged state
///
/// Taken at an enclosing-transaction savepoint and handed back on
/// rollback. Copies are independent of the live buffer: later merges
/// never touch a snapshot's maps.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSnapshot {
    entries: HashMap<DocId, PendingEntry>,
    partial: HashMap<DocId, IndexDocument>,
    generation: u64,
}

/// What a flush call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// Generation unchanged since the last flush; nothing touched
    NoOp,
    /// At least one pending id has no storage row yet; writes deferred to
    /// commit
    Deferred,
    /// Writes applied inside a fresh speculative savepoint
    Applied {
        /// Number of write operations applied
        ops: usize,
    },
}

/// Transaction-scoped staging area for catalog mutations
///
/// Owned by one transaction context; never shared. The enclosing
/// transaction lifecycle drives `savepoint`/`rollback`/`flush`/`commit`/
/// `abort` as explicit callbacks.
#[derive(Debug, Default)]
pub struct PendingBuffer {
    entries: HashMap<DocId, PendingEntry>,
    partial: HashMap<DocId, IndexDocument>,
    generation: u64,
    flushed_generation: u64,
    deferred_generation: u64,
    speculative: Option<String>,
    state: BufferState,
}

impl Default for BufferState {
    fn default() -> Self {
        BufferState::Idle
    }
}

impl PendingBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        PendingBuffer::default()
    }

    /// Current lifecycle state
    pub fn state(&self) -> BufferState {
        self.state
    }

    /// Whether the buffer has enrolled in the enclosing transaction
    pub fn is_joined(&self) -> bool {
        !matches!(self.state, BufferState::Idle)
    }

    /// Current generation counter
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Number of staged ids (full, tombstone, and partial)
    pub fn len(&self) -> usize {
        self.entries.len() + self.partial.len()
    }

    /// Whether nothing is staged
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.partial.is_empty()
    }

    /// The staged entry for an id, if any
    pub fn entry(&self, id: DocId) -> Option<&PendingEntry> {
        self.entries.get(&id)
    }

    /// The accumulated partial patch for an id, if any
    pub fn partial(&self, id: DocId) -> Option<&IndexDocument> {
        self.partial.get(&id)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Stage a full (re)catalog of one document
    ///
    /// Discards any partial patch staged for the same id: the full entry
    /// supersedes it.
    pub fn set(&mut self, id: DocId, entry: FullEntry) {
        self.partial.remove(&id);
        self.entries.insert(id, PendingEntry::Full(entry));
        self.touch();
    }

    /// Stage removal of one document from the catalog
    pub fn uncatalog(&mut self, id: DocId) {
        self.partial.remove(&id);
        self.entries.insert(id, PendingEntry::Uncatalog);
        self.touch();
    }

    /// Stage a partial index-document patch for one document
    ///
    /// If a full entry is staged for the id, the patch merges into a
    /// fresh copy of its document (the original map is left intact, so
    /// previously taken snapshots are unaffected). A patch against a
    /// tombstoned id is a no-op: there is no document to patch.
    pub fn merge_partial(&mut self, id: DocId, patch: IndexDocument) {
        match self.entries.get(&id) {
            Some(PendingEntry::Full(full)) => {
                let merged = FullEntry {
                    path: full.path.clone(),
                    document: merge_document(&full.document, &patch),
                    fulltext: full.fulltext.clone(),
                };
                self.entries.insert(id, PendingEntry::Full(merged));
            }
            Some(PendingEntry::Uncatalog) => {
                debug!(%id, "ignoring partial patch for tombstoned id");
                return;
            }
            None => {
                let merged = match self.partial.get(&id) {
                    Some(existing) => merge_document(existing, &patch),
                    None => patch,
                };
                self.partial.insert(id, merged);
            }
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.generation += 1;
        if matches!(self.state, BufferState::Idle) {
            self.state = BufferState::Joined;
        }
    }

    // ------------------------------------------------------------------
    // Savepoint participation
    // ------------------------------------------------------------------

    /// Copy the staged state for an enclosing-transaction savepoint
    ///
    /// Cost is bounded by the pending set size.
    pub fn savepoint(&self) -> BufferSnapshot {
        BufferSnapshot {
            entries: self.entries.clone(),
            partial: self.partial.clone(),
            generation: self.generation,
        }
    }

    /// Restore the staged state from a snapshot
    ///
    /// Idempotent and safe to call from error-cleanup paths: restoring a
    /// snapshot twice, or when nothing speculative happened since, simply
    /// re-installs the same maps. The store side of any speculative flush
    /// is reconciled by the next `flush`/`commit`/`abort`, which compare
    /// the restored generation against the flushed one.
    pub fn rollback(&mut self, snapshot: &BufferSnapshot) {
        self.entries = snapshot.entries.clone();
        self.partial = snapshot.partial.clone();
        self.generation = snapshot.generation;
    }

    // ------------------------------------------------------------------
    // Flush / commit / abort
    // ------------------------------------------------------------------

    /// Speculatively apply staged writes inside a nested savepoint
    ///
    /// See the module docs for the full semantics. Idempotent for an
    /// unchanged generation counter: calling twice with no intervening
    /// mutation performs zero additional storage writes.
    ///
    /// # Errors
    ///
    /// Propagates store errors. If applying fails, the speculative
    /// savepoint is rolled back first; the staged state stays intact for
    /// retry or abort.
    pub fn flush(&mut self, store: &mut dyn IndexStore) -> Result<FlushOutcome> {
        if self.generation == self.flushed_generation {
            return Ok(FlushOutcome::NoOp);
        }
        if self.generation == self.deferred_generation {
            return Ok(FlushOutcome::Deferred);
        }

        for id in self.pending_ids() {
            if !store.has_row(id)? {
                debug!(%id, "no storage row yet; deferring generation to commit");
                self.retract_speculative(store)?;
                self.deferred_generation = self.generation;
                return Ok(FlushOutcome::Deferred);
            }
        }

        self.retract_speculative(store)?;

        let ops = self.build_ops();
        let name = format!("cairn_flush_{}", self.generation);
        store.savepoint(&name)?;
        if let Err(e) = store.apply(&ops) {
            store.rollback_to(&name)?;
            store.release(&name)?;
            return Err(e);
        }

        debug!(generation = self.generation, ops = ops.len(), "flushed pending writes");
        self.speculative = Some(name);
        self.flushed_generation = self.generation;
        self.deferred_generation = 0;
        self.state = BufferState::Flushed;
        Ok(FlushOutcome::Applied { ops: ops.len() })
    }

    /// Write staged state through at transaction commit
    ///
    /// If the flushed speculative state is current, its savepoint is
    /// released; otherwise the speculative state is retracted and the
    /// final staged state applied directly. The buffer is cleared
    /// unconditionally afterward, success or failure.
    ///
    /// # Errors
    ///
    /// Propagates store errors; the buffer is still cleared.
    pub fn commit(&mut self, store: &mut dyn IndexStore) -> Result<()> {
        let result = self.commit_inner(store);
        if result.is_ok() {
            self.state = BufferState::Committed;
            debug!(generation = self.generation, "pending buffer committed");
        }
        self.reset();
        result
    }

    fn commit_inner(&mut self, store: &mut dyn IndexStore) -> Result<()> {
        if self.generation == self.flushed_generation {
            if let Some(name) = self.speculative.take() {
                store.release(&name)?;
            }
            return Ok(());
        }

        self.retract_speculative(store)?;
        let ops = self.build_ops();
        if !ops.is_empty() {
            store.apply(&ops)?;
        }
        Ok(())
    }

    /// Discard staged state at transaction abort
    ///
    /// Rolls back any speculative savepoint, then clears the buffer
    /// unconditionally. Safe to call from error-cleanup paths, including
    /// when nothing was ever flushed.
    ///
    /// # Errors
    ///
    /// Propagates store errors; the buffer is still cleared.
    pub fn abort(&mut self, store: &mut dyn IndexStore) -> Result<()> {
        let result = self.retract_speculative(store);
        if result.is_ok() {
            self.state = BufferState::RolledBack;
            debug!("pending buffer rolled back");
        }
        self.reset();
        result
    }

    /// Roll back and drop the speculative savepoint, if one exists
    fn retract_speculative(&mut self, store: &mut dyn IndexStore) -> Result<()> {
        if let Some(name) = self.speculative.take() {
            store.rollback_to(&name)?;
            store.release(&name)?;
            self.flushed_generation = 0;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.entries.clear();
        self.partial.clear();
        self.generation = 0;
        self.flushed_generation = 0;
        self.deferred_generation = 0;
        self.speculative = None;
        self.state = BufferState::Idle;
    }

    /// All staged ids, sorted for deterministic apply order
    fn pending_ids(&self) -> Vec<DocId> {
        let mut ids: Vec<DocId> = self
            .entries
            .keys()
            .chain(self.partial.keys())
            .copied()
            .collect();
        ids.sort();
        ids
    }

    /// Materialize the staged state as store write operations
    fn build_ops(&self) -> Vec<WriteOp> {
        let mut ops = Vec::with_capacity(self.len());
        for id in self.pending_ids() {
            if let Some(entry) = self.entries.get(&id) {
                match entry {
                    PendingEntry::Full(full) => ops.push(WriteOp::Upsert {
                        id,
                        path: full.path.clone(),
                        document: full.document.clone(),
                        fulltext: full.fulltext.clone(),
                    }),
                    PendingEntry::Uncatalog => ops.push(WriteOp::Remove { id }),
                }
            } else if let Some(patch) = self.partial.get(&id) {
                ops.push(WriteOp::MergeDocument {
                    id,
                    patch: patch.clone(),
                });
            }
        }
        ops
    }
}

// ============================================================================
// Tests
// ============================================================================


// ============================================================================
// Property tests
// ============================================================================
