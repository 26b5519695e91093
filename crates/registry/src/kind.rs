//! Index kinds and definitions

use cairn_core::IndexName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tagged category of an index
///
/// The kind decides which predicate shape the compiler emits for a term.
/// `Extensible` kinds carry a tag resolved against the registry's
/// translator table, so new kinds can be added without touching the
/// compiler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    /// Exact/range match on a single extracted value
    Field,
    /// Multi-valued set membership (any-of / all-of)
    Keyword,
    /// Normalized date match and range
    Date,
    /// Two-valued truthy match
    Boolean,
    /// Composite effective-window over two date attributes
    DateRange,
    /// UUID equality in canonical form
    Uuid,
    /// Hierarchical path queries
    Path,
    /// Full-text match via the ranking backend
    FullText,
    /// Custom kind resolved through a registered translator
    Extensible(String),
}

impl IndexKind {
    /// Whether this kind is served by dedicated columns/logic rather than
    /// a generic storage-key lookup
    pub fn is_special(&self) -> bool {
        matches!(
            self,
            IndexKind::Path | IndexKind::FullText | IndexKind::DateRange
        )
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexKind::Field => write!(f, "field"),
            IndexKind::Keyword => write!(f, "keyword"),
            IndexKind::Date => write!(f, "date"),
            IndexKind::Boolean => write!(f, "boolean"),
            IndexKind::DateRange => write!(f, "date_range"),
            IndexKind::Uuid => write!(f, "uuid"),
            IndexKind::Path => write!(f, "path"),
            IndexKind::FullText => write!(f, "full_text"),
            IndexKind::Extensible(tag) => write!(f, "extensible({})", tag),
        }
    }
}

/// One registered index: name, kind, storage key, source attributes
///
/// `storage_key = None` marks a *special* index served by dedicated
/// columns (path, full-text, date-range) instead of a key lookup in the
/// index document. `source_attrs` lists the domain-object attributes the
/// extraction layer reads to compute the index's value; extraction itself
/// lives outside this crate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Index name, as it appears in query specifications
    pub name: IndexName,
    /// Index kind
    pub kind: IndexKind,
    /// Key in the index document serving this index; `None` for special
    /// indexes
    pub storage_key: Option<IndexName>,
    /// Domain attributes feeding extraction
    pub source_attrs: Vec<IndexName>,
}

impl IndexDefinition {
    /// Create a definition with the conventional storage key
    ///
    /// Generic kinds default to a storage key equal to the index name;
    /// special kinds (path, full-text, date-range) default to none.
    pub fn new(name: IndexName, kind: IndexKind) -> Self {
        let storage_key = if kind.is_special() {
            None
        } else {
            Some(name.clone())
        };
        IndexDefinition {
            name,
            kind,
            storage_key,
            source_attrs: Vec::new(),
        }
    }

    /// Override the storage key
    pub fn with_storage_key(mut self, key: Option<IndexName>) -> Self {
        self.storage_key = key;
        self
    }

    /// Set the source attributes
    pub fn with_source_attrs(mut self, attrs: Vec<IndexName>) -> Self {
        self.source_attrs = attrs;
        self
    }

    /// The storage key, if this index has one
    pub fn key(&self) -> Option<&IndexName> {
        self.storage_key.as_ref()
    }

    /// The two date attributes of a composite date-range index
    ///
    /// Returns `(start, end)` from the first two source attributes, or
    /// `None` if the definition does not carry both.
    pub fn date_range_bounds(&self) -> Option<(&IndexName, &IndexName)> {
        match self.source_attrs.as_slice() {
            [start, end, ..] => Some((start, end)),
            _ => None,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
