//! Per-kind predicate builders
//!
//! Each builder turns one query term into at most one self-contained
//! clause. Returning `Ok(None)` adds nothing to the predicate — the
//! deliberate no-op for absent values. Every literal binds through the
//! shared parameter list; the only text spliced into a clause is the
//! validated storage key.

use cairn_core::dialect::COL_DOC;
use cairn_core::{
    CanonicalDate, CatalogError, DateFidelity, DateInput, IndexName, Param, Params, QueryTerm,
    RangeMode, Result, SetOperator,
};
use cairn_registry::IndexDefinition;
use serde_json::{json, Value};
use tracing::warn;

/// Parenthesized extraction of a storage key from the index document
pub(crate) fn doc_key(key: &IndexName) -> String {
    format!("({} -> '{}')", COL_DOC, key.as_str())
}

fn bind_json(params: &mut Params, value: Value) -> String {
    params.push(Param::Json(value))
}

fn in_list(extracted: &str, values: Vec<Value>, params: &mut Params, negated: bool) -> String {
    if values.len() == 1 {
        let placeholder = bind_json(params, values.into_iter().next().unwrap());
        let op = if negated { "<>" } else { "=" };
        format!("{} {} {}", extracted, op, placeholder)
    } else {
        let placeholders: Vec<String> = values
            .into_iter()
            .map(|v| bind_json(params, v))
            .collect();
        let op = if negated { "NOT IN" } else { "IN" };
        format!("{} {} ({})", extracted, op, placeholders.join(", "))
    }
}

fn combine(parts: Vec<String>) -> Option<String> {
    match parts.len() {
        0 => None,
        1 => parts.into_iter().next(),
        _ => Some(format!("({})", parts.join(" AND "))),
    }
}

/// Exact / set / negated / range matching on one extracted value
pub(crate) fn field_clause(
    index: &str,
    key: &IndexName,
    term: &QueryTerm,
    params: &mut Params,
) -> Result<Option<String>> {
    let extracted = doc_key(key);
    let values = term.query_values();
    let mut parts = Vec::new();

    if !values.is_empty() {
        match term.range() {
            Some(range) => parts.push(range_clause(index, &extracted, range, values, params)?),
            None => parts.push(in_list(&extracted, values, params, false)),
        }
    }

    let nots = term.not_values();
    if !nots.is_empty() {
        parts.push(in_list(&extracted, nots, params, true));
    }

    Ok(combine(parts))
}

fn range_clause(
    index: &str,
    extracted: &str,
    range: RangeMode,
    values: Vec<Value>,
    params: &mut Params,
) -> Result<String> {
    match range {
        RangeMode::Min => {
            let placeholder = bind_json(params, values.into_iter().next().unwrap());
            Ok(format!("{} >= {}", extracted, placeholder))
        }
        RangeMode::Max => {
            let placeholder = bind_json(params, values.into_iter().next().unwrap());
            Ok(format!("{} <= {}", extracted, placeholder))
        }
        RangeMode::MinMax => {
            if values.len() < 2 {
                return Err(CatalogError::InvalidQuery {
                    index: index.to_string(),
                    reason: "min:max range requires two values".to_string(),
                });
            }
            let mut iter = values.into_iter();
            let low = bind_json(params, iter.next().unwrap());
            let high = bind_json(params, iter.next().unwrap());
            Ok(format!(
                "({} >= {} AND {} <= {})",
                extracted, low, extracted, high
            ))
        }
    }
}

/// Set overlap (any-of) or containment (all-of) on a multi-valued key
pub(crate) fn keyword_clause(
    key: &IndexName,
    term: &QueryTerm,
    params: &mut Params,
) -> Result<Option<String>> {
    let extracted = doc_key(key);
    let mut parts = Vec::new();

    let values = keyword_strings(term.query_values());
    if !values.is_empty() {
        let op = match term.operator() {
            SetOperator::Or => "?|",
            SetOperator::And => "?&",
        };
        let placeholder = params.push(Param::TextArray(values));
        parts.push(format!("{} {} {}", extracted, op, placeholder));
    }

    let nots = keyword_strings(term.not_values());
    if !nots.is_empty() {
        let placeholder = params.push(Param::TextArray(nots));
        parts.push(format!("NOT ({} ?| {})", extracted, placeholder));
    }

    Ok(combine(parts))
}

fn keyword_strings(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        })
        .collect()
}

/// Two-valued truthy match
pub(crate) fn boolean_clause(
    key: &IndexName,
    term: &QueryTerm,
    params: &mut Params,
) -> Result<Option<String>> {
    let extracted = doc_key(key);
    let mut parts = Vec::new();

    if let Some(value) = term.query_values().first() {
        let placeholder = bind_json(params, json!(truthy(value)));
        parts.push(format!("{} = {}", extracted, placeholder));
    }
    if let Some(value) = term.not_values().first() {
        let placeholder = bind_json(params, json!(truthy(value)));
        parts.push(format!("{} <> {}", extracted, placeholder));
    }

    Ok(combine(parts))
}

/// Truthy coercion for boolean terms
pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !matches!(s.as_str(), "" | "0" | "false" | "False" | "no" | "off"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

/// Date matching with boundary normalization
///
/// Every value normalizes to the canonical UTC form before binding.
/// Inputs without an explicit offset are assumed UTC and flagged with a
/// warning; the assumption is surfaced, never silently fixed.
pub(crate) fn date_clause(
    index: &str,
    key: &IndexName,
    term: &QueryTerm,
    params: &mut Params,
) -> Result<Option<String>> {
    let extracted = doc_key(key);
    let mut parts = Vec::new();

    let values = normalize_dates(index, term.query_values())?;
    if !values.is_empty() {
        match term.range() {
            Some(range) => parts.push(range_clause(index, &extracted, range, values, params)?),
            None => parts.push(in_list(&extracted, values, params, false)),
        }
    }

    let nots = normalize_dates(index, term.not_values())?;
    if !nots.is_empty() {
        parts.push(in_list(&extracted, nots, params, true));
    }

    Ok(combine(parts))
}

fn normalize_dates(index: &str, values: Vec<Value>) -> Result<Vec<Value>> {
    values
        .into_iter()
        .map(|value| {
            let (date, fidelity) = CanonicalDate::from_input(&date_input(index, &value)?)?;
            if fidelity == DateFidelity::AssumedUtc {
                warn!(
                    index,
                    value = %value,
                    "date input carries no offset; assuming UTC (ordering may be session-dependent at the source)"
                );
            }
            Ok(json!(date.to_bound_string()))
        })
        .collect()
}

fn date_input(index: &str, value: &Value) -> Result<DateInput> {
    match value {
        Value::String(s) => Ok(DateInput::Iso(s.clone())),
        Value::Number(n) => n
            .as_i64()
            .map(DateInput::EpochSeconds)
            .ok_or_else(|| CatalogError::InvalidQuery {
                index: index.to_string(),
                reason: format!("unusable date number {}", n),
            }),
        other => Err(CatalogError::InvalidQuery {
            index: index.to_string(),
            reason: format!("unusable date value {}", other),
        }),
    }
}

/// Composite effective-window match: one instant against two bounds
///
/// Compiles to `start <= instant AND (end absent OR end >= instant)`.
pub(crate) fn date_range_clause(
    definition: &IndexDefinition,
    term: &QueryTerm,
    params: &mut Params,
) -> Result<Option<String>> {
    let index = definition.name.as_str();
    let Some((start_key, end_key)) = definition.date_range_bounds() else {
        warn!(index, "date-range index lacks its two bound attributes; skipping");
        return Ok(None);
    };

    let mut instants = normalize_dates(index, term.query_values())?;
    let Some(instant) = instants.pop() else {
        return Ok(None);
    };

    let start = doc_key(start_key);
    let end = doc_key(end_key);
    let placeholder = bind_json(params, instant);
    Ok(Some(format!(
        "({} <= {} AND ({} IS NULL OR {} >= {}))",
        start, placeholder, end, end, placeholder
    )))
}

/// UUID equality in canonical hyphenated form
pub(crate) fn uuid_clause(
    index: &str,
    key: &IndexName,
    term: &QueryTerm,
    params: &mut Params,
) -> Result<Option<String>> {
    let extracted = doc_key(key);
    let mut parts = Vec::new();

    let values = normalize_uuids(index, term.query_values())?;
    if !values.is_empty() {
        parts.push(in_list(&extracted, values, params, false));
    }
    let nots = normalize_uuids(index, term.not_values())?;
    if !nots.is_empty() {
        parts.push(in_list(&extracted, nots, params, true));
    }

    Ok(combine(parts))
}

fn normalize_uuids(index: &str, values: Vec<Value>) -> Result<Vec<Value>> {
    values
        .into_iter()
        .map(|value| {
            let s = value.as_str().ok_or_else(|| CatalogError::InvalidQuery {
                index: index.to_string(),
                reason: format!("unusable uuid value {}", value),
            })?;
            let parsed = uuid::Uuid::parse_str(s).map_err(|e| CatalogError::InvalidQuery {
                index: index.to_string(),
                reason: format!("unusable uuid {:?}: {}", s, e),
            })?;
            Ok(json!(parsed.hyphenated().to_string()))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
