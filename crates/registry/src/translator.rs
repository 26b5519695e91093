//! Translator capability for extensible index kinds

use crate::kind::IndexDefinition;
use cairn_core::{Params, QueryTerm, Result, SortDirection};
use serde_json::Value;

/// Pluggable behavior for an [`crate::IndexKind::Extensible`] index
///
/// A translator owns the three seams a kind needs: computing the stored
/// value at write time, compiling a query term into a predicate clause,
/// and producing a sort expression. New kinds register a translator under
/// their tag instead of extending the kind enum or the compiler.
pub trait IndexTranslator: Send + Sync {
    /// Compute the stored index value from a raw source value
    ///
    /// Returning `Ok(None)` stores nothing for this index. A failure here
    /// skips this field only, never the whole write.
    ///
    /// # Errors
    ///
    /// Returns an error if the source value is unusable; the write path
    /// logs it and continues with the remaining fields.
    fn extract(&self, definition: &IndexDefinition, source: &Value) -> Result<Option<Value>>;

    /// Compile a query term into a predicate clause
    ///
    /// All literal values must be bound through `params`; the returned
    /// clause may only splice validated identifiers. Returning `Ok(None)`
    /// adds no clause.
    ///
    /// # Errors
    ///
    /// Returns an error if the term is unusable; the compiler logs it and
    /// skips this field only.
    fn query(
        &self,
        definition: &IndexDefinition,
        term: &QueryTerm,
        params: &mut Params,
    ) -> Result<Option<String>>;

    /// Produce a sort expression for this index, if it is sortable
    fn sort(&self, definition: &IndexDefinition, direction: SortDirection) -> Option<String>;
}
