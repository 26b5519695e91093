//! Storage dialect shared by the compiler, ranking backends, and executors
//!
//! Compiled predicates address one wide `docs` record per document. The
//! column names and operator spellings here are the contract between the
//! compiler (which emits them), ranking backends (which extend them), and
//! the execution layer (which runs them). Only these identifiers — plus
//! validated [`crate::IndexName`] / [`crate::ContentPath`] values — ever
//! appear as literal predicate text.

/// Integer document id column
pub const COL_ID: &str = "docs.id";
/// Semi-structured index document column
pub const COL_DOC: &str = "docs.idx";
/// Hierarchical path column
pub const COL_PATH: &str = "docs.path";
/// Parent-path column (derived from `path` at write time)
pub const COL_PARENT: &str = "docs.parent";
/// Path segment count column (derived from `path` at write time)
pub const COL_DEPTH: &str = "docs.depth";
/// Full-text payload column
pub const COL_FULLTEXT: &str = "docs.fulltext";

/// Window-aggregate expression yielding the total match count per row
///
/// Selecting this alongside the id/path columns lets a limited query
/// report its untruncated total without a second round trip.
pub const TOTAL_COUNT_EXPR: &str = "count(*) over ()";

/// Escape clause appended to every `LIKE` pattern comparison
pub const LIKE_ESCAPE: &str = " ESCAPE '\\'";

/// Escape `LIKE` wildcards in a literal so it matches itself
///
/// The result is still bound as a parameter; escaping only neutralizes
/// `%`, `_`, and `\` so a literal path or token cannot act as a pattern.
pub fn escape_like(literal: &str) -> String {
    let mut out = String::with_capacity(literal.len());
    for ch in literal.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
