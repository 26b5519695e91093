//! Ranking backend capability for Cairn
//!
//! Full-text terms do not compile to a fixed predicate shape: they
//! delegate to the active [`RankingBackend`], which owns the match
//! predicate, the optional relevance expression, and the derived columns
//! it needs at write time.
//!
//! Exactly one baseline implementation ([`BasicRanking`]) is always
//! available; the enhanced [`TextSearchRanking`] backend is auto-detected
//! at startup and falls back to baseline transparently on any detection
//! failure — full-text search degrades, it never errors out.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod basic;
mod detect;
mod tsrank;

pub use basic::BasicRanking;
pub use detect::detect_backend;
pub use tsrank::TextSearchRanking;

use cairn_core::Params;

/// A derived column a backend needs maintained at write time
///
/// The write path computes `expression` over the full-text payload and
/// stores the result in the named column alongside the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedField {
    /// Column name (unqualified)
    pub name: String,
    /// Expression computing the column from the full-text payload
    pub expression: String,
}

/// Compiled full-text match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchExpr {
    /// Match predicate text; literals bound through the shared params
    pub predicate: String,
    /// Relevance expression, if the backend ranks at all
    pub rank_expr: Option<String>,
}

/// Pluggable full-text match and ranking strategy
pub trait RankingBackend: Send + Sync {
    /// Backend name, for logs and diagnostics
    fn name(&self) -> &'static str;

    /// Derived columns this backend needs maintained at write time
    fn derived_fields(&self) -> Vec<DerivedField>;

    /// Schema statements preparing the derived columns
    fn schema_setup(&self) -> Vec<String>;

    /// Compile a full-text query into a match predicate and optional rank
    ///
    /// Returns `None` when the query text holds no usable tokens; the
    /// compiler treats that as a no-op term. All literals must be bound
    /// through `params`.
    fn match_and_rank(
        &self,
        query_text: &str,
        language: Option<&str>,
        params: &mut Params,
    ) -> Option<MatchExpr>;

    /// Whether lower rank values mean more relevant
    ///
    /// Decides the direction of the automatic relevance ordering.
    fn rank_ascending(&self) -> bool;

    /// Columns to null out when a document leaves the catalog
    fn columns_to_clear(&self) -> Vec<String>;
}
