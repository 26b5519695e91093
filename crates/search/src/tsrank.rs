//! Enhanced text-search ranking backend
//!
//! Uses the store's text-search capability: a derived `fulltext_tsv`
//! column maintained at write time, a tsquery match predicate, and a
//! relevance rank expression that becomes the automatic ordering when no
//! explicit sort is requested.

use crate::{DerivedField, MatchExpr, RankingBackend};
use cairn_core::{Param, Params};

/// Derived text-search vector column (unqualified)
const TSV_COLUMN: &str = "fulltext_tsv";
/// Qualified spelling used in predicates
const TSV_QUALIFIED: &str = "docs.fulltext_tsv";

/// Text-search ranking backend
///
/// `language` is the configuration used when a query carries no explicit
/// language hint.
#[derive(Debug, Clone)]
pub struct TextSearchRanking {
    language: String,
}

impl TextSearchRanking {
    /// Create the backend with the default language configuration
    pub fn new() -> Self {
        TextSearchRanking {
            language: "simple".to_string(),
        }
    }

    /// Create the backend with an explicit default language
    pub fn with_language(language: impl Into<String>) -> Self {
        TextSearchRanking {
            language: language.into(),
        }
    }
}

impl Default for TextSearchRanking {
    fn default() -> Self {
        TextSearchRanking::new()
    }
}

impl RankingBackend for TextSearchRanking {
    fn name(&self) -> &'static str {
        "text_search"
    }

    fn derived_fields(&self) -> Vec<DerivedField> {
        vec![DerivedField {
            name: TSV_COLUMN.to_string(),
            expression: format!("to_tsvector('{}', coalesce(fulltext, ''))", self.language),
        }]
    }

    fn schema_setup(&self) -> Vec<String> {
        vec![
            format!("ALTER TABLE docs ADD COLUMN IF NOT EXISTS {} tsvector", TSV_COLUMN),
            format!(
                "CREATE INDEX IF NOT EXISTS docs_{}_idx ON docs USING gin ({})",
                TSV_COLUMN, TSV_COLUMN
            ),
        ]
    }

    fn match_and_rank(
        &self,
        query_text: &str,
        language: Option<&str>,
        params: &mut Params,
    ) -> Option<MatchExpr> {
        let text = query_text.trim();
        if text.is_empty() {
            return None;
        }

        let language = language.unwrap_or(&self.language);
        let lang_placeholder = params.push(Param::Text(language.to_string()));
        let text_placeholder = params.push(Param::Text(text.to_string()));
        let tsquery = format!(
            "plainto_tsquery({}::regconfig, {})",
            lang_placeholder, text_placeholder
        );

        Some(MatchExpr {
            predicate: format!("{} @@ {}", TSV_QUALIFIED, tsquery),
            rank_expr: Some(format!("ts_rank_cd({}, {})", TSV_QUALIFIED, tsquery)),
        })
    }

    fn rank_ascending(&self) -> bool {
        // Higher rank values are more relevant
        false
    }

    fn columns_to_clear(&self) -> Vec<String> {
        vec!["fulltext".to_string(), TSV_COLUMN.to_string()]
    }
}

// ============================================================================
// Tests
// ============================================================================
