//! Ordering resolution
//!
//! `sort_on` accepts one or more keys; `sort_order` supplies per-key
//! directions, with a shorter list repeating its last element. A sort key
//! that cannot be resolved is dropped with a warning — ordering degrades,
//! it never fails the compile.

use crate::term::doc_key;
use cairn_core::dialect::COL_PATH;
use cairn_core::{QuerySpec, SortDirection};
use cairn_registry::{IndexKind, IndexRegistry};
use tracing::warn;

/// Relevance ordering captured while compiling a full-text term
#[derive(Debug, Clone)]
pub(crate) struct RankInfo {
    /// Rank expression (parameters already bound)
    pub expr: String,
    /// Whether lower rank values mean more relevant
    pub ascending: bool,
}

impl RankInfo {
    fn order_term(&self, direction: Option<SortDirection>) -> String {
        let direction = direction.unwrap_or(if self.ascending {
            SortDirection::Ascending
        } else {
            SortDirection::Descending
        });
        format!("{} {}", self.expr, direction.as_sql())
    }
}

/// Build the plan's ordering text
///
/// With no explicit `sort_on`, a captured relevance rank becomes the
/// automatic ordering.
pub(crate) fn order_by(
    spec: &QuerySpec,
    registry: &IndexRegistry,
    rank: Option<&RankInfo>,
) -> Option<String> {
    if spec.sort_on.is_empty() {
        return rank.map(|r| r.order_term(None));
    }

    let mut terms: Vec<String> = Vec::new();
    for (position, key) in spec.sort_on.iter().enumerate() {
        let direction = direction_at(&spec.sort_order, position);
        match resolve_key(key, direction, registry, rank) {
            Some(term) => terms.push(term),
            None => warn!(%key, "unresolvable sort key dropped"),
        }
    }

    if terms.is_empty() {
        None
    } else {
        Some(terms.join(", "))
    }
}

/// Direction for the key at `position`; a shorter list repeats its last
/// element
fn direction_at(order: &[SortDirection], position: usize) -> SortDirection {
    order
        .get(position)
        .or_else(|| order.last())
        .copied()
        .unwrap_or_default()
}

fn resolve_key(
    key: &str,
    direction: SortDirection,
    registry: &IndexRegistry,
    rank: Option<&RankInfo>,
) -> Option<String> {
    let definition = registry.lookup(key)?;
    match &definition.kind {
        IndexKind::Path => Some(format!("{} {}", COL_PATH, direction.as_sql())),
        IndexKind::FullText => rank.map(|r| r.order_term(Some(direction))),
        IndexKind::DateRange => definition
            .date_range_bounds()
            .map(|(start, _)| format!("{} {}", doc_key(start), direction.as_sql())),
        IndexKind::Extensible(tag) => registry
            .translator(tag)
            .and_then(|t| t.sort(&definition, direction)),
        _ => definition
            .key()
            .map(|k| format!("{} {}", doc_key(k), direction.as_sql())),
    }
}

// ============================================================================
// Tests
// ============================================================================
