// Field classification over untyped records.
//
// Every function here is total: missing fields, nulls and unparseable
// values classify as false / 0 instead of failing.

use std::collections::HashSet;

use crate::constants::{GEO_VOCABULARY, TIME_MIN_CORROBORATING_SAMPLES};
use crate::data::{Record, Value};
use crate::timebucket::value_to_day;

/// The one numeric coercion rule shared by classification, key resolution
/// and aggregation. Booleans, null and blank text do not coerce.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) if n.is_finite() => Some(*n),
        Value::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
        }
        _ => None,
    }
}

/// Contribution of a cell to a sum: its numeric value, or 0.
pub fn measure_of(row: &Record, key: Option<&str>) -> f64 {
    key.and_then(|k| row.get(k))
        .and_then(coerce_number)
        .unwrap_or(0.0)
}

/// True iff every row's value at `key` is absent, blank, or numeric.
/// An empty row set is not numeric.
pub fn is_numeric_field(rows: &[Record], key: &str) -> bool {
    if rows.is_empty() {
        return false;
    }

    rows.iter().all(|row| match row.get(key) {
        None => true,
        Some(v) if v.is_blank() => true,
        Some(v) => coerce_number(v).is_some(),
    })
}

/// True if at least one row carries a present, numeric value at `key`.
pub fn has_numeric_value(rows: &[Record], key: &str) -> bool {
    rows.iter()
        .filter_map(|row| row.get(key))
        .any(|v| coerce_number(v).is_some())
}

/// Probe up to `sample_limit` leading rows for dates at `key`.
///
/// A single date-like string is not enough: the field needs
/// `min(3, total rows)` parsed samples.
pub fn is_time_field(rows: &[Record], key: &str, sample_limit: usize) -> bool {
    if rows.is_empty() {
        return false;
    }

    let parsed = rows
        .iter()
        .take(sample_limit)
        .filter_map(|row| row.get(key))
        .filter(|v| !v.is_blank())
        .filter(|v| value_to_day(v).is_some())
        .count();

    let required = TIME_MIN_CORROBORATING_SAMPLES.min(rows.len());
    let is_time = parsed >= required;
    tracing::trace!(key, parsed, required, is_time, "time probe");
    is_time
}

/// Whether `key` names a geographic field.
///
/// A field listed in `hints` matches when equal ignoring case. Otherwise the
/// name is checked against the geo vocabulary, where a substring is enough
/// (`zip_code_5` is geo).
pub fn is_geo_field(key: &str, hints: &[String]) -> bool {
    if hints.iter().any(|h| h.eq_ignore_ascii_case(key)) {
        return true;
    }

    let lowered = key.to_ascii_lowercase();
    GEO_VOCABULARY.iter().any(|term| lowered.contains(term))
}

/// Exact (case-insensitive) vocabulary match, used before the substring pass.
pub fn is_geo_vocabulary_term(key: &str) -> bool {
    GEO_VOCABULARY.iter().any(|term| term.eq_ignore_ascii_case(key))
}

/// Number of distinct non-null string forms of `key` across all rows.
pub fn category_cardinality(rows: &[Record], key: &str) -> usize {
    rows.iter()
        .filter_map(|row| row.get(key))
        .filter_map(Value::label)
        .collect::<HashSet<_>>()
        .len()
}

/// Every row holds a string or number at `key`.
pub fn is_plain_category(rows: &[Record], key: &str) -> bool {
    !rows.is_empty()
        && rows
            .iter()
            .all(|row| matches!(row.get(key), Some(Value::Text(_)) | Some(Value::Number(_))))
}
