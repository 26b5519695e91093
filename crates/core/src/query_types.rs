//! Query and compiled-plan contract types
//!
//! This module defines the interface contracts between callers, the query
//! compiler, and the execution layer:
//! - QuerySpec: structured query specification (index name → term)
//! - QueryTerm / TermOptions: bare literal or structured per-index criteria
//! - Plan: compiled {predicate, params, order_by, limit, offset}
//! - Param / Params: bound parameter values and placeholder allocation
//!
//! Reserved meta-keys (`sort_on`, `sort_order`, `limit`, `b_size`,
//! `b_start`) control ordering and pagination and are never treated as
//! index names.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Meta-key selecting one or more sort keys
pub const KEY_SORT_ON: &str = "sort_on";
/// Meta-key selecting per-key sort directions
pub const KEY_SORT_ORDER: &str = "sort_order";
/// Meta-key for an explicit row limit (overrides `b_size`)
pub const KEY_LIMIT: &str = "limit";
/// Meta-key for the batch size used when no explicit limit is given
pub const KEY_BATCH_SIZE: &str = "b_size";
/// Meta-key for the batch start offset
pub const KEY_BATCH_START: &str = "b_start";

/// All reserved meta-keys
pub const RESERVED_KEYS: [&str; 5] = [
    KEY_SORT_ON,
    KEY_SORT_ORDER,
    KEY_LIMIT,
    KEY_BATCH_SIZE,
    KEY_BATCH_START,
];

// ============================================================================
// Term options
// ============================================================================

/// Set combination operator for multi-valued criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SetOperator {
    /// Any of the values may match (default)
    #[default]
    Or,
    /// All of the values must match
    And,
}

impl SetOperator {
    /// Parse from the wire spelling ("or" / "and", case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "or" => Some(SetOperator::Or),
            "and" => Some(SetOperator::And),
            _ => None,
        }
    }
}

/// Range interpretation of a term's query values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeMode {
    /// Match values >= the query value
    Min,
    /// Match values <= the query value
    Max,
    /// Match values between the two query values (inclusive)
    MinMax,
}

impl RangeMode {
    /// Parse from the wire spelling ("min" / "max" / "min:max")
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "min" => Some(RangeMode::Min),
            "max" => Some(RangeMode::Max),
            "min:max" | "minmax" => Some(RangeMode::MinMax),
            _ => None,
        }
    }
}

/// Per-key sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SortDirection {
    /// Ascending order (default)
    #[default]
    Ascending,
    /// Descending order
    Descending,
}

impl SortDirection {
    /// Parse from the wire spelling; "reverse" is accepted as descending
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(SortDirection::Ascending),
            "desc" | "descending" | "reverse" => Some(SortDirection::Descending),
            _ => None,
        }
    }

    /// The SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

/// Structured criteria for one index
///
/// Every field is optional; an options object with no `query` and no `not`
/// contributes nothing to the compiled predicate (a deliberate no-op, not
/// "match everything" or "match nothing").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TermOptions {
    /// Query value or list of values
    pub query: Option<Value>,
    /// Range interpretation of the query values
    pub range: Option<RangeMode>,
    /// Value or list of values to exclude
    pub not: Option<Value>,
    /// Combination operator for multi-valued criteria
    pub operator: SetOperator,
    /// Maximum additional depth for path subtree queries
    pub depth: Option<i64>,
    /// Navigation-siblings mode for path queries
    pub navtree: bool,
    /// Number of top path levels skipped in navigation mode
    pub navtree_start: usize,
}

impl TermOptions {
    /// Options with just a query value
    pub fn query(value: impl Into<Value>) -> Self {
        TermOptions {
            query: Some(value.into()),
            ..Default::default()
        }
    }

    /// Set the range interpretation
    pub fn with_range(mut self, range: RangeMode) -> Self {
        self.range = Some(range);
        self
    }

    /// Set the excluded value(s)
    pub fn with_not(mut self, not: impl Into<Value>) -> Self {
        self.not = Some(not.into());
        self
    }

    /// Set the combination operator
    pub fn with_operator(mut self, operator: SetOperator) -> Self {
        self.operator = operator;
        self
    }

    /// Set the subtree depth bound
    pub fn with_depth(mut self, depth: i64) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Enable navigation-siblings mode
    pub fn with_navtree(mut self, start: usize) -> Self {
        self.navtree = true;
        self.navtree_start = start;
        self
    }
}

// ============================================================================
// Query terms and the specification
// ============================================================================

/// One entry of a query specification: bare literal or structured options
#[derive(Debug, Clone, PartialEq)]
pub enum QueryTerm {
    /// A bare literal criterion (scalar or list)
    Literal(Value),
    /// Structured criteria
    Options(TermOptions),
}

impl QueryTerm {
    /// The query values, normalized to a list
    ///
    /// A scalar yields one value, an array yields its elements, and an
    /// absent or null query yields an empty list.
    pub fn query_values(&self) -> Vec<Value> {
        let raw = match self {
            QueryTerm::Literal(v) => Some(v),
            QueryTerm::Options(opts) => opts.query.as_ref(),
        };
        normalize_values(raw)
    }

    /// The excluded values, normalized to a list
    pub fn not_values(&self) -> Vec<Value> {
        match self {
            QueryTerm::Literal(_) => Vec::new(),
            QueryTerm::Options(opts) => normalize_values(opts.not.as_ref()),
        }
    }

    /// The range interpretation, if any
    pub fn range(&self) -> Option<RangeMode> {
        match self {
            QueryTerm::Literal(_) => None,
            QueryTerm::Options(opts) => opts.range,
        }
    }

    /// The combination operator
    pub fn operator(&self) -> SetOperator {
        match self {
            QueryTerm::Literal(_) => SetOperator::Or,
            QueryTerm::Options(opts) => opts.operator,
        }
    }

    /// The structured options, if this term carries them
    pub fn as_options(&self) -> Option<&TermOptions> {
        match self {
            QueryTerm::Literal(_) => None,
            QueryTerm::Options(opts) => Some(opts),
        }
    }

    /// Whether this term contributes nothing to the predicate
    pub fn is_noop(&self) -> bool {
        self.query_values().is_empty() && self.not_values().is_empty()
    }
}

fn normalize_values(raw: Option<&Value>) -> Vec<Value> {
    match raw {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter(|v| !v.is_null()).cloned().collect(),
        Some(v) => vec![v.clone()],
    }
}

/// Error when parsing a query specification from JSON
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuerySpecError {
    /// The top-level value was not an object
    NotAnObject,
    /// A reserved meta-key held an unusable value
    InvalidMetaValue {
        /// The meta-key
        key: String,
        /// What was wrong
        reason: String,
    },
    /// A term option held an unusable value
    InvalidOption {
        /// The index name the option was supplied for
        index: String,
        /// The option name
        option: String,
        /// What was wrong
        reason: String,
    },
}

impl fmt::Display for QuerySpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuerySpecError::NotAnObject => {
                write!(f, "query specification must be a JSON object")
            }
            QuerySpecError::InvalidMetaValue { key, reason } => {
                write!(f, "invalid value for meta-key {}: {}", key, reason)
            }
            QuerySpecError::InvalidOption {
                index,
                option,
                reason,
            } => {
                write!(f, "invalid option {} for index {}: {}", option, index, reason)
            }
        }
    }
}

impl std::error::Error for QuerySpecError {}

/// Structured query specification
///
/// A mapping of index name → criteria plus sort and pagination controls
/// lifted out of the reserved meta-keys. Construct programmatically with
/// the builder methods or parse one from JSON with [`QuerySpec::from_json`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct QuerySpec {
    terms: BTreeMap<String, QueryTerm>,
    /// Sort keys, in priority order
    pub sort_on: Vec<String>,
    /// Per-key directions; a shorter list repeats its last element
    pub sort_order: Vec<SortDirection>,
    /// Explicit row limit (overrides `batch_size`)
    pub limit: Option<u64>,
    /// Batch size used when no explicit limit is given
    pub batch_size: Option<u64>,
    /// Row offset
    pub batch_start: u64,
}

impl QuerySpec {
    /// Create an empty specification
    pub fn new() -> Self {
        QuerySpec::default()
    }

    /// Whether the specification has no terms and no controls
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
            && self.sort_on.is_empty()
            && self.limit.is_none()
            && self.batch_size.is_none()
            && self.batch_start == 0
    }

    /// Iterate over (index name, term) pairs in name order
    pub fn terms(&self) -> impl Iterator<Item = (&str, &QueryTerm)> {
        self.terms.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up the term for one index name
    pub fn term(&self, name: &str) -> Option<&QueryTerm> {
        self.terms.get(name)
    }

    /// Add a bare literal criterion
    pub fn with_term(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.terms
            .insert(name.into(), QueryTerm::Literal(value.into()));
        self
    }

    /// Add structured criteria
    pub fn with_options(mut self, name: impl Into<String>, options: TermOptions) -> Self {
        self.terms.insert(name.into(), QueryTerm::Options(options));
        self
    }

    /// Append a sort key with a direction
    pub fn with_sort(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_on.push(key.into());
        self.sort_order.push(direction);
        self
    }

    /// Set the explicit row limit
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set batch size and start offset
    pub fn with_batch(mut self, size: u64, start: u64) -> Self {
        self.batch_size = Some(size);
        self.batch_start = start;
        self
    }

    /// Parse a specification from a JSON object
    ///
    /// Reserved meta-keys are lifted into the sort/pagination fields; every
    /// other key becomes a term. Object values parse as [`TermOptions`]
    /// (unrecognized option keys are ignored); anything else is a bare
    /// literal.
    ///
    /// # Errors
    ///
    /// Returns `QuerySpecError` if the top level is not an object or a
    /// recognized meta/option value is malformed.
    pub fn from_json(value: &Value) -> Result<Self, QuerySpecError> {
        let object = value.as_object().ok_or(QuerySpecError::NotAnObject)?;
        let mut spec = QuerySpec::new();

        for (key, raw) in object {
            match key.as_str() {
                KEY_SORT_ON => spec.sort_on = parse_string_list(raw, KEY_SORT_ON)?,
                KEY_SORT_ORDER => {
                    spec.sort_order = parse_string_list(raw, KEY_SORT_ORDER)?
                        .iter()
                        .map(|s| {
                            SortDirection::parse(s).ok_or_else(|| {
                                QuerySpecError::InvalidMetaValue {
                                    key: KEY_SORT_ORDER.to_string(),
                                    reason: format!("unknown direction {:?}", s),
                                }
                            })
                        })
                        .collect::<Result<_, _>>()?;
                }
                KEY_LIMIT => spec.limit = Some(parse_count(raw, KEY_LIMIT)?),
                KEY_BATCH_SIZE => spec.batch_size = Some(parse_count(raw, KEY_BATCH_SIZE)?),
                KEY_BATCH_START => spec.batch_start = parse_count(raw, KEY_BATCH_START)?,
                name => {
                    let term = match raw {
                        Value::Object(fields) => {
                            QueryTerm::Options(parse_options(name, fields)?)
                        }
                        other => QueryTerm::Literal(other.clone()),
                    };
                    spec.terms.insert(name.to_string(), term);
                }
            }
        }

        Ok(spec)
    }
}

fn parse_string_list(raw: &Value, key: &str) -> Result<Vec<String>, QuerySpecError> {
    match raw {
        Value::String(s) => Ok(vec![s.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    QuerySpecError::InvalidMetaValue {
                        key: key.to_string(),
                        reason: "expected a string or list of strings".to_string(),
                    }
                })
            })
            .collect(),
        _ => Err(QuerySpecError::InvalidMetaValue {
            key: key.to_string(),
            reason: "expected a string or list of strings".to_string(),
        }),
    }
}

fn parse_count(raw: &Value, key: &str) -> Result<u64, QuerySpecError> {
    raw.as_u64().ok_or_else(|| QuerySpecError::InvalidMetaValue {
        key: key.to_string(),
        reason: "expected a non-negative integer".to_string(),
    })
}

fn parse_options(
    index: &str,
    fields: &serde_json::Map<String, Value>,
) -> Result<TermOptions, QuerySpecError> {
    let mut opts = TermOptions::default();

    for (option, raw) in fields {
        match option.as_str() {
            "query" => opts.query = Some(raw.clone()),
            "not" => opts.not = Some(raw.clone()),
            "range" => {
                if raw.is_null() {
                    continue;
                }
                let s = raw.as_str().ok_or_else(|| invalid_option(index, option, raw))?;
                opts.range =
                    Some(RangeMode::parse(s).ok_or_else(|| invalid_option(index, option, raw))?);
            }
            "operator" => {
                let s = raw.as_str().ok_or_else(|| invalid_option(index, option, raw))?;
                opts.operator =
                    SetOperator::parse(s).ok_or_else(|| invalid_option(index, option, raw))?;
            }
            "depth" => {
                opts.depth =
                    Some(raw.as_i64().ok_or_else(|| invalid_option(index, option, raw))?);
            }
            "navtree" => {
                opts.navtree = raw.as_bool().ok_or_else(|| invalid_option(index, option, raw))?;
            }
            "navtree_start" => {
                opts.navtree_start = raw
                    .as_u64()
                    .ok_or_else(|| invalid_option(index, option, raw))?
                    as usize;
            }
            // Unrecognized option keys are ignored, matching the layer's
            // lenient posture toward caller-supplied specs.
            _ => {}
        }
    }

    Ok(opts)
}

fn invalid_option(index: &str, option: &str, raw: &Value) -> QuerySpecError {
    QuerySpecError::InvalidOption {
        index: index.to_string(),
        option: option.to_string(),
        reason: format!("unusable value {}", raw),
    }
}

// ============================================================================
// Compiled plans and parameters
// ============================================================================

/// A bound parameter value
///
/// Every literal in a query specification binds as one of these; literal
/// text never reaches the predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Param {
    /// Text value
    Text(String),
    /// Integer value
    Int(i64),
    /// Float value
    Float(f64),
    /// Boolean value
    Bool(bool),
    /// Semi-structured value, compared in the index document's type space
    Json(Value),
    /// Text array (for overlap/containment operators)
    TextArray(Vec<String>),
}

/// Ordered parameter list with placeholder allocation
///
/// Placeholders are `$1..$n` in first-use order; pushing a value returns
/// the placeholder that references it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: Vec<Param>,
}

impl Params {
    /// Create an empty parameter list
    pub fn new() -> Self {
        Params::default()
    }

    /// Bind a value, returning its placeholder
    pub fn push(&mut self, value: Param) -> String {
        self.values.push(value);
        format!("${}", self.values.len())
    }

    /// Number of bound values
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no values are bound
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The bound values, in placeholder order
    pub fn as_slice(&self) -> &[Param] {
        &self.values
    }

    /// Consume into the bound values, in placeholder order
    pub fn into_vec(self) -> Vec<Param> {
        self.values
    }
}

/// A compiled query plan
///
/// `predicate` is empty when the specification constrained nothing; the
/// executor composes the final statement (adding a `WHERE` only when a
/// predicate exists, and a window-aggregate total column when a limit may
/// truncate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    /// Predicate text; empty when no criteria applied
    pub predicate: String,
    /// Bound parameters, in `$1..$n` order
    pub params: Vec<Param>,
    /// Ordering text, if any
    pub order_by: Option<String>,
    /// Row limit, if any
    pub limit: Option<u64>,
    /// Row offset
    pub offset: u64,
}

impl Plan {
    /// Whether the plan filters at all
    pub fn has_predicate(&self) -> bool {
        !self.predicate.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
