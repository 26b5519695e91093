//! The query compiler
//!
//! `compile` is a pure function over the injected registry and ranking
//! backend: specification in, plan out. No I/O, no locking, no state
//! beyond the configuration it was built with.

use crate::config::QueryConfig;
use crate::path::path_clause;
use crate::sort::{order_by, RankInfo};
use crate::term::{
    boolean_clause, date_clause, date_range_clause, field_clause, keyword_clause, uuid_clause,
};
use cairn_core::{IndexName, Params, Plan, QuerySpec, QueryTerm, Result};
use cairn_registry::{IndexDefinition, IndexKind, IndexRegistry};
use cairn_search::RankingBackend;
use std::sync::Arc;
use tracing::warn;

/// Compiles query specifications into executable plans
///
/// Holds the injected collaborators: the registry resolving index names
/// and the ranking backend serving full-text terms.
pub struct QueryCompiler {
    registry: Arc<IndexRegistry>,
    ranking: Arc<dyn RankingBackend>,
    config: QueryConfig,
}

impl QueryCompiler {
    /// Create a compiler with the default configuration
    pub fn new(registry: Arc<IndexRegistry>, ranking: Arc<dyn RankingBackend>) -> Self {
        QueryCompiler {
            registry,
            ranking,
            config: QueryConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// The injected registry
    pub fn registry(&self) -> &IndexRegistry {
        &self.registry
    }

    /// The active ranking backend
    pub fn ranking(&self) -> &dyn RankingBackend {
        self.ranking.as_ref()
    }

    /// Compile a specification into a plan
    ///
    /// Terms compile in index-name order, so equal specifications always
    /// produce byte-identical plans. A term whose query value is absent
    /// contributes nothing. An index name with no registry entry degrades
    /// to a generic key-equality predicate against the index document —
    /// deliberately lenient, so a mistyped name "succeeds" as a
    /// non-matching query rather than erroring.
    ///
    /// # Errors
    ///
    /// Fails hard on unsafe identifiers, invalid paths, malformed query
    /// values, and a path-root count above the configured cap.
    pub fn compile(&self, spec: &QuerySpec) -> Result<Plan> {
        let mut params = Params::new();
        let mut clauses: Vec<String> = Vec::new();
        let mut rank: Option<RankInfo> = None;

        for (name, term) in spec.terms() {
            if term.is_noop() {
                continue;
            }

            let clause = match self.registry.lookup(name) {
                Some(definition) => {
                    self.compile_term(name, &definition, term, &mut params, &mut rank)?
                }
                None => {
                    let key = IndexName::new(name)?;
                    field_clause(name, &key, term, &mut params)?
                }
            };

            if let Some(clause) = clause {
                clauses.push(clause);
            }
        }

        let order_by = order_by(spec, &self.registry, rank.as_ref());
        let limit = spec
            .limit
            .or(spec.batch_size)
            .or(self.config.default_batch_size);

        Ok(Plan {
            predicate: clauses.join(" AND "),
            params: params.into_vec(),
            order_by,
            limit,
            offset: spec.batch_start,
        })
    }

    fn compile_term(
        &self,
        name: &str,
        definition: &IndexDefinition,
        term: &QueryTerm,
        params: &mut Params,
        rank: &mut Option<RankInfo>,
    ) -> Result<Option<String>> {
        match &definition.kind {
            IndexKind::Path => path_clause(name, term, params, self.config.max_path_roots),
            IndexKind::FullText => Ok(self.fulltext_clause(term, params, rank)),
            IndexKind::DateRange => date_range_clause(definition, term, params),
            IndexKind::Extensible(tag) => Ok(self.translated_clause(name, tag, definition, term, params)),
            kind => {
                let Some(key) = definition.key() else {
                    warn!(index = name, %kind, "index has no storage key; skipping");
                    return Ok(None);
                };
                match kind {
                    IndexKind::Keyword => keyword_clause(key, term, params),
                    IndexKind::Boolean => boolean_clause(key, term, params),
                    IndexKind::Date => date_clause(name, key, term, params),
                    IndexKind::Uuid => uuid_clause(name, key, term, params),
                    _ => field_clause(name, key, term, params),
                }
            }
        }
    }

    fn fulltext_clause(
        &self,
        term: &QueryTerm,
        params: &mut Params,
        rank: &mut Option<RankInfo>,
    ) -> Option<String> {
        let text = term
            .query_values()
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect::<Vec<_>>()
            .join(" ");

        let language = self.config.default_language.as_deref();
        let matched = self.ranking.match_and_rank(&text, language, params)?;
        if let Some(expr) = matched.rank_expr {
            *rank = Some(RankInfo {
                expr,
                ascending: self.ranking.rank_ascending(),
            });
        }
        Some(matched.predicate)
    }

    fn translated_clause(
        &self,
        name: &str,
        tag: &str,
        definition: &IndexDefinition,
        term: &QueryTerm,
        params: &mut Params,
    ) -> Option<String> {
        let Some(translator) = self.registry.translator(tag) else {
            warn!(index = name, tag, "no translator registered for extensible index; skipping");
            return None;
        };
        match translator.query(definition, term, params) {
            Ok(clause) => clause,
            Err(e) => {
                warn!(index = name, tag, error = %e, "translator failed; skipping field");
                None
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
