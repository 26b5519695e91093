//! Hierarchical path queries
//!
//! One path term resolves to one of six modes, driven by the `depth`,
//! `navtree`, and `navtree_start` options:
//!
//! | options                  | mode                 | matches                         |
//! |--------------------------|----------------------|---------------------------------|
//! | (none)                   | Subtree              | self + all descendants          |
//! | `depth: 0`               | Exact                | self only                       |
//! | `depth: 1`               | Children             | direct children, excludes self  |
//! | `depth: n > 1`           | DepthLimited         | self + descendants to depth n   |
//! | `navtree, depth: 0`      | Breadcrumbs          | ancestor exacts at every level  |
//! | `navtree`                | Navigation           | ancestors' children sets        |
//!
//! Multiple roots combine with OR; the root count is capped to bound
//! query cost. Every root is validated against the path grammar before
//! any of it reaches predicate text, and prefix patterns are LIKE-escaped.

use cairn_core::dialect::{escape_like, COL_DEPTH, COL_PARENT, COL_PATH, LIKE_ESCAPE};
use cairn_core::{CatalogError, ContentPath, Param, Params, QueryTerm, Result};
use serde_json::Value;

/// Resolved path query mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMode {
    /// Self and all descendants
    Subtree,
    /// Self only
    Exact,
    /// Direct children, excluding self
    Children,
    /// Self and descendants down to this many levels below the root
    DepthLimited(i64),
    /// Ancestor exact matches at every level, including self
    Breadcrumbs,
    /// Ancestors' children sets, skipping `start` top levels
    Navigation {
        /// Number of top levels to skip
        start: usize,
    },
}

impl PathMode {
    /// Resolve the mode from a term's options
    pub fn resolve(term: &QueryTerm) -> PathMode {
        let Some(opts) = term.as_options() else {
            return PathMode::Subtree;
        };
        if opts.navtree {
            return match opts.depth {
                Some(0) => PathMode::Breadcrumbs,
                _ => PathMode::Navigation {
                    start: opts.navtree_start,
                },
            };
        }
        match opts.depth {
            None => PathMode::Subtree,
            Some(d) if d < 0 => PathMode::Subtree,
            Some(0) => PathMode::Exact,
            Some(1) => PathMode::Children,
            Some(d) => PathMode::DepthLimited(d),
        }
    }
}

/// Compile one path term
pub(crate) fn path_clause(
    index: &str,
    term: &QueryTerm,
    params: &mut Params,
    max_roots: usize,
) -> Result<Option<String>> {
    let roots = parse_roots(index, term.query_values())?;
    if roots.len() > max_roots {
        return Err(CatalogError::TooManyPathRoots {
            count: roots.len(),
            max: max_roots,
        });
    }

    let mode = PathMode::resolve(term);
    let mut branches: Vec<String> = Vec::new();
    for root in &roots {
        if let Some(branch) = root_clause(root, mode, params) {
            branches.push(branch);
        }
    }

    let mut parts: Vec<String> = Vec::new();
    match branches.len() {
        0 => {}
        1 => parts.push(branches.into_iter().next().unwrap()),
        _ => parts.push(format!("({})", branches.join(" OR "))),
    }

    // Exclusions are exact-path only
    let excluded = parse_roots(index, term.not_values())?;
    if !excluded.is_empty() {
        let placeholders: Vec<String> = excluded
            .iter()
            .map(|p| params.push(Param::Text(p.as_str().to_string())))
            .collect();
        parts.push(format!("{} NOT IN ({})", COL_PATH, placeholders.join(", ")));
    }

    match parts.len() {
        0 => Ok(None),
        1 => Ok(parts.into_iter().next()),
        _ => Ok(Some(format!("({})", parts.join(" AND ")))),
    }
}

fn parse_roots(index: &str, values: Vec<Value>) -> Result<Vec<ContentPath>> {
    values
        .into_iter()
        .map(|value| {
            let s = value.as_str().ok_or_else(|| CatalogError::InvalidQuery {
                index: index.to_string(),
                reason: format!("unusable path value {}", value),
            })?;
            Ok(ContentPath::new(s)?)
        })
        .collect()
}

fn root_clause(root: &ContentPath, mode: PathMode, params: &mut Params) -> Option<String> {
    match mode {
        PathMode::Subtree => {
            let exact = params.push(Param::Text(root.as_str().to_string()));
            let prefix = params.push(Param::Text(descendant_pattern(root)));
            Some(format!(
                "({} = {} OR {} LIKE {}{})",
                COL_PATH, exact, COL_PATH, prefix, LIKE_ESCAPE
            ))
        }
        PathMode::Exact => {
            let exact = params.push(Param::Text(root.as_str().to_string()));
            Some(format!("{} = {}", COL_PATH, exact))
        }
        PathMode::Children => {
            let parent = params.push(Param::Text(root.as_str().to_string()));
            Some(format!("{} = {}", COL_PARENT, parent))
        }
        PathMode::DepthLimited(levels) => {
            let exact = params.push(Param::Text(root.as_str().to_string()));
            let prefix = params.push(Param::Text(descendant_pattern(root)));
            let bound = params.push(Param::Int(root.depth() as i64 + levels));
            Some(format!(
                "({} = {} OR ({} LIKE {}{} AND {} <= {}))",
                COL_PATH, exact, COL_PATH, prefix, LIKE_ESCAPE, COL_DEPTH, bound
            ))
        }
        PathMode::Breadcrumbs => {
            let chain = root.ancestry();
            in_set(COL_PATH, &chain, params)
        }
        PathMode::Navigation { start } => {
            let mut parents = vec![ContentPath::root()];
            parents.extend(root.ancestry());
            parents.retain(|p| p.depth() >= start);
            in_set(COL_PARENT, &parents, params)
        }
    }
}

fn descendant_pattern(root: &ContentPath) -> String {
    if root.is_root() {
        "/%".to_string()
    } else {
        format!("{}/%", escape_like(root.as_str()))
    }
}

fn in_set(column: &str, paths: &[ContentPath], params: &mut Params) -> Option<String> {
    match paths {
        [] => None,
        [only] => {
            let placeholder = params.push(Param::Text(only.as_str().to_string()));
            Some(format!("{} = {}", column, placeholder))
        }
        many => {
            let placeholders: Vec<String> = many
                .iter()
                .map(|p| params.push(Param::Text(p.as_str().to_string())))
                .collect();
            Some(format!("{} IN ({})", column, placeholders.join(", ")))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
