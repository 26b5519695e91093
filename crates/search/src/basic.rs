//! Baseline ranking backend
//!
//! Always available, no schema requirements: each query token becomes a
//! case-insensitive substring match against the full-text column, all
//! tokens must match, and there is no relevance ordering. Search works
//! everywhere; it just doesn't rank.

use crate::{DerivedField, MatchExpr, RankingBackend};
use cairn_core::dialect::{escape_like, COL_FULLTEXT, LIKE_ESCAPE};
use cairn_core::{Param, Params};

/// Baseline substring-match backend
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicRanking;

impl BasicRanking {
    /// Create the baseline backend
    pub fn new() -> Self {
        BasicRanking
    }
}

impl RankingBackend for BasicRanking {
    fn name(&self) -> &'static str {
        "basic"
    }

    fn derived_fields(&self) -> Vec<DerivedField> {
        Vec::new()
    }

    fn schema_setup(&self) -> Vec<String> {
        Vec::new()
    }

    fn match_and_rank(
        &self,
        query_text: &str,
        _language: Option<&str>,
        params: &mut Params,
    ) -> Option<MatchExpr> {
        let tokens: Vec<&str> = query_text.split_whitespace().collect();
        if tokens.is_empty() {
            return None;
        }

        let clauses: Vec<String> = tokens
            .iter()
            .map(|token| {
                let pattern = format!("%{}%", escape_like(&token.to_lowercase()));
                let placeholder = params.push(Param::Text(pattern));
                format!("{} ILIKE {}{}", COL_FULLTEXT, placeholder, LIKE_ESCAPE)
            })
            .collect();

        let predicate = if clauses.len() == 1 {
            clauses.into_iter().next().unwrap()
        } else {
            format!("({})", clauses.join(" AND "))
        };

        Some(MatchExpr {
            predicate,
            rank_expr: None,
        })
    }

    fn rank_ascending(&self) -> bool {
        false
    }

    fn columns_to_clear(&self) -> Vec<String> {
        vec!["fulltext".to_string()]
    }
}

// ============================================================================
// Tests
// ============================================================================
