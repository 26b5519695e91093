//! Core types and traits for Cairn
//!
//! This crate defines the foundational types used throughout the system:
//! - DocId: Stable integer identifier for cataloged documents
//! - IndexDocument: Per-document semi-structured map of index values
//! - IndexName / ContentPath: Validated identifier contracts
//! - CanonicalDate: Normalized date representation for comparisons
//! - QuerySpec / Plan / Param: Query and compiled-plan contract types
//! - Dialect: Storage column names and operator spellings plans address
//! - Error: Error type hierarchy
//! - Traits: Consumed collaborator ports (IndexStore, DocumentLoader, StoreProbe)

#![warn(missing_docs)]
#![warn(clippy::all)]

// Module declarations
pub mod contract;
pub mod datetime;
pub mod dialect;
pub mod error;
pub mod query_types;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use contract::{
    ContentPath, ContentPathError, IndexName, IndexNameError, MAX_INDEX_NAME_LENGTH,
    MAX_PATH_LENGTH,
};
pub use datetime::{CanonicalDate, DateError, DateFidelity, DateInput, ToCanonicalDate};
pub use error::{CatalogError, Result};
pub use query_types::{
    Param, Params, Plan, QuerySpec, QuerySpecError, QueryTerm, RangeMode, SetOperator,
    SortDirection, TermOptions, KEY_BATCH_SIZE, KEY_BATCH_START, KEY_LIMIT, KEY_SORT_ON,
    KEY_SORT_ORDER, RESERVED_KEYS,
};
pub use traits::{DocumentLoader, IndexStore, StoreProbe, WriteOp};
pub use types::{merge_document, DocId, IndexDocument, ResultRow};
