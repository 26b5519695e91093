//! The index registry
//!
//! Authoritative map of index name → definition, plus the metadata-name
//! set and the translator table for extensible kinds.
//!
//! ## Concurrency
//!
//! Backed by `DashMap`: lookups are safe during concurrent `register`/
//! `sync` calls without external locking. Writes are additive only —
//! nothing here ever removes an entry, so readers can cache lookups for
//! the duration of a request.

use crate::kind::IndexDefinition;
use crate::translator::IndexTranslator;
use dashmap::{DashMap, DashSet};
use std::sync::Arc;
use tracing::debug;

use cairn_core::{CatalogError, IndexName, Result};

/// Authoritative index registry
///
/// An explicit instance owned by the surrounding service and injected
/// into the compiler and the write path; never global state.
#[derive(Default)]
pub struct IndexRegistry {
    indexes: DashMap<String, IndexDefinition>,
    metadata: DashSet<String>,
    translators: DashMap<String, Arc<dyn IndexTranslator>>,
}

impl IndexRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        IndexRegistry::default()
    }

    /// Register one index definition
    ///
    /// Re-registering a name overwrites its definition.
    ///
    /// # Errors
    ///
    /// Fails hard if the name or storage key violates the identifier
    /// grammar; unsafe identifiers are never sanitized.
    pub fn register(&self, definition: IndexDefinition) -> Result<()> {
        Self::check_identifiers(&definition)?;
        debug!(index = %definition.name, kind = %definition.kind, "registering index");
        self.indexes
            .insert(definition.name.as_str().to_string(), definition);
        Ok(())
    }

    /// Additive reconciliation from an external definition source
    ///
    /// Inserts new entries and overwrites entries present in the input.
    /// Entries absent from the input are deliberately never removed; the
    /// registry only ever grows.
    ///
    /// # Errors
    ///
    /// Fails hard on the first invalid identifier; earlier entries of the
    /// same call remain registered.
    pub fn sync<I>(&self, definitions: I) -> Result<()>
    where
        I: IntoIterator<Item = IndexDefinition>,
    {
        for definition in definitions {
            self.register(definition)?;
        }
        Ok(())
    }

    /// Look up a definition by name
    pub fn lookup(&self, name: &str) -> Option<IndexDefinition> {
        self.indexes.get(name).map(|entry| entry.value().clone())
    }

    /// Whether an index is registered under this name
    pub fn contains(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }

    /// All registered index names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.indexes.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Number of registered indexes
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Whether no indexes are registered
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// Track a name as retrievable metadata
    ///
    /// Metadata names hydrate into result handles but are not
    /// independently queryable.
    ///
    /// # Errors
    ///
    /// Fails hard if the name violates the identifier grammar.
    pub fn add_metadata(&self, name: &str) -> Result<()> {
        IndexName::validate(name).map_err(CatalogError::UnsafeIdentifier)?;
        self.metadata.insert(name.to_string());
        Ok(())
    }

    /// Whether a name is tracked as metadata
    pub fn is_metadata(&self, name: &str) -> bool {
        self.metadata.contains(name)
    }

    /// All metadata names, sorted
    pub fn metadata_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.metadata.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Register a translator under an extensible-kind tag
    pub fn register_translator(&self, tag: impl Into<String>, translator: Arc<dyn IndexTranslator>) {
        self.translators.insert(tag.into(), translator);
    }

    /// Look up the translator for an extensible-kind tag
    pub fn translator(&self, tag: &str) -> Option<Arc<dyn IndexTranslator>> {
        self.translators.get(tag).map(|entry| entry.value().clone())
    }

    fn check_identifiers(definition: &IndexDefinition) -> Result<()> {
        IndexName::validate(definition.name.as_str()).map_err(CatalogError::UnsafeIdentifier)?;
        if let Some(key) = definition.key() {
            IndexName::validate(key.as_str()).map_err(CatalogError::UnsafeIdentifier)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
