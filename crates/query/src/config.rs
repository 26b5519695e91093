//! Compiler configuration

/// Query compiler configuration
///
/// Controls the knobs that are deployment policy rather than query
/// semantics.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Batch size applied when a spec carries neither `limit` nor `b_size`
    ///
    /// `None` leaves such queries unbounded.
    pub default_batch_size: Option<u64>,
    /// Maximum number of roots a single path term may supply
    ///
    /// Each root adds an OR branch to the predicate; the cap bounds query
    /// cost.
    pub max_path_roots: usize,
    /// Language hint passed to the ranking backend
    ///
    /// `None` lets the backend use its own default.
    pub default_language: Option<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            default_batch_size: None,
            max_path_roots: 32,
            default_language: None,
        }
    }
}

impl QueryConfig {
    /// Set the fallback batch size
    pub fn with_default_batch_size(mut self, size: u64) -> Self {
        self.default_batch_size = Some(size);
        self
    }

    /// Set the path-root cap
    pub fn with_max_path_roots(mut self, max: usize) -> Self {
        self.max_path_roots = max;
        self
    }

    /// Set the full-text language hint
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = Some(language.into());
        self
    }
}
