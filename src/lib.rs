//! Cairn — transactional secondary-index catalog and query layer
//!
//! Cairn sits between a document store addressed by stable integer ids
//! and the application that queries it:
//!
//! - the [`IndexRegistry`] maps index names to kinds, storage keys, and
//!   source attributes;
//! - the [`QueryCompiler`] turns a [`QuerySpec`] into an executable
//!   [`Plan`] (predicate text, bound parameters, ordering, pagination);
//! - the [`PendingBuffer`] stages index mutations inside the enclosing
//!   transaction, with savepoint rollback and same-transaction
//!   read-your-writes flushing;
//! - [`ResultSet`] wraps executed rows into lazily hydrated handles.
//!
//! # Quick Start
//!
//! ```
//! use cairndb::{IndexDefinition, IndexKind, IndexName, IndexRegistry, QueryCompiler, QuerySpec};
//! use cairndb::search::BasicRanking;
//! use std::sync::Arc;
//!
//! let registry = Arc::new(IndexRegistry::new());
//! registry.register(IndexDefinition::new(
//!     IndexName::new("status").unwrap(),
//!     IndexKind::Field,
//! ))?;
//!
//! let compiler = QueryCompiler::new(registry, Arc::new(BasicRanking::new()));
//! let plan = compiler.compile(&QuerySpec::new().with_term("status", "published"))?;
//! assert_eq!(plan.predicate, "(docs.idx -> 'status') = $1");
//! # Ok::<(), cairndb::CatalogError>(())
//! ```
//!
//! # Architecture
//!
//! Extraction of index values from domain objects, execution of compiled
//! plans, and connection handling are external collaborators, consumed
//! through the traits in [`cairn_core::traits`]. The compiler is pure;
//! the buffer is transaction-scoped and never shared.

// Re-export the public API from the workspace crates
pub use cairn_core::{
    dialect, merge_document, CanonicalDate, CatalogError, ContentPath, ContentPathError, DateError,
    DateFidelity, DateInput, DocId, DocumentLoader, IndexDocument, IndexName, IndexNameError,
    IndexStore, Param, Params, Plan, QuerySpec, QuerySpecError, QueryTerm, RangeMode, Result,
    ResultRow, SetOperator, SortDirection, StoreProbe, TermOptions, ToCanonicalDate, WriteOp,
    KEY_BATCH_SIZE, KEY_BATCH_START, KEY_LIMIT, KEY_SORT_ON, KEY_SORT_ORDER, RESERVED_KEYS,
};
pub use cairn_query::{PathMode, QueryCompiler, QueryConfig, ResultHandle, ResultSet};
pub use cairn_registry::{IndexDefinition, IndexKind, IndexRegistry, IndexTranslator};
pub use cairn_txn::{BufferSnapshot, BufferState, FlushOutcome, FullEntry, PendingBuffer, PendingEntry};

/// Ranking backend capability (baseline, enhanced, and detection)
pub mod search {
    pub use cairn_search::{
        detect_backend, BasicRanking, DerivedField, MatchExpr, RankingBackend, TextSearchRanking,
    };
}
