use crate::classify::{
    category_cardinality, has_numeric_value, is_geo_field, is_geo_vocabulary_term,
    is_plain_category, is_time_field,
};
use crate::constants::{HEATMAP_CATEGORY_CARDINALITY_MAX, HEATMAP_CATEGORY_CARDINALITY_MIN};
use crate::data::DataSpec;
use crate::ir::{GridColumns, ResolvedKeys};

/// Resolve the geo, time, dimension and value keys for a data spec.
///
/// Explicit hints win over heuristics, heuristics over nothing. Only the
/// spec's own rows are consulted.
pub fn resolve_keys(spec: &DataSpec, time_sample_limit: usize) -> ResolvedKeys {
    let headers = spec.sample_headers();

    // 1. Geo
    let geo_key = resolve_geo_key(&headers, &spec.hints.geo_fields);

    // 2. Dimension (hint only; category detection is a grid concern)
    let dimension_key = spec.hints.dimension_field.clone();

    // 3. Time
    let measure_hint = spec.hints.measure_fields.first().map(String::as_str);
    let time_key = spec.hints.time_field.clone().or_else(|| {
        let excluded = [geo_key.as_deref(), dimension_key.as_deref(), measure_hint];
        first_time_field(spec, &headers, &excluded, time_sample_limit)
    });

    // 4. Value
    let value_key = resolve_value_key(
        spec,
        &headers,
        &[
            dimension_key.as_deref(),
            time_key.as_deref(),
            geo_key.as_deref(),
        ],
    );

    let keys = ResolvedKeys {
        geo_key,
        time_key,
        dimension_key,
        value_key,
    };
    tracing::debug!(?keys, "resolved keys");
    keys
}

/// Geo key as it appears in the data.
///
/// Hinted names must match a header exactly (ignoring case). Without a hit
/// the vocabulary is tried: exact terms first, substrings as a last resort.
fn resolve_geo_key(headers: &[&str], geo_hints: &[String]) -> Option<String> {
    let hinted = if geo_hints.is_empty() {
        None
    } else {
        headers
            .iter()
            .find(|h| geo_hints.iter().any(|hint| hint.eq_ignore_ascii_case(h)))
    };

    hinted
        .or_else(|| headers.iter().find(|h| is_geo_vocabulary_term(h)))
        .or_else(|| headers.iter().find(|h| is_geo_field(h, &[])))
        .map(|h| h.to_string())
}

fn resolve_value_key(
    spec: &DataSpec,
    headers: &[&str],
    excluded: &[Option<&str>],
) -> Option<String> {
    if let Some(measure) = spec.hints.measure_fields.first() {
        return Some(measure.clone());
    }

    headers
        .iter()
        .filter(|h| !is_excluded(h, excluded))
        .filter(|h| !is_geo_field(h, &spec.hints.geo_fields))
        .find(|h| has_numeric_value(&spec.rows, h))
        .map(|h| h.to_string())
        .or_else(|| spec.hints.y_key.clone())
}

fn first_time_field(
    spec: &DataSpec,
    headers: &[&str],
    excluded: &[Option<&str>],
    time_sample_limit: usize,
) -> Option<String> {
    headers
        .iter()
        .filter(|h| !is_excluded(h, excluded))
        .find(|h| is_time_field(&spec.rows, h, time_sample_limit))
        .map(|h| h.to_string())
}

fn is_excluded(header: &str, excluded: &[Option<&str>]) -> bool {
    excluded.iter().flatten().any(|e| *e == header)
}

/// Pick the heat-grid column source.
///
/// Order: hinted dimension, then a detected low-cardinality category, then
/// day buckets of a time field, then the constant `"Value"` column. A
/// category axis wider than the inclusive limit is unreadable, so such
/// fields fall through to time bucketing.
pub fn resolve_grid_columns(
    spec: &DataSpec,
    keys: &ResolvedKeys,
    time_sample_limit: usize,
) -> GridColumns {
    if let Some(dim) = &keys.dimension_key {
        return GridColumns::Category(dim.clone());
    }

    let headers = spec.sample_headers();

    let category_excluded = [keys.geo_key.as_deref(), keys.value_key.as_deref()];
    let category = headers
        .iter()
        .filter(|h| !is_excluded(h, &category_excluded))
        .find(|h| {
            let distinct = category_cardinality(&spec.rows, h);
            (HEATMAP_CATEGORY_CARDINALITY_MIN..=HEATMAP_CATEGORY_CARDINALITY_MAX)
                .contains(&distinct)
                && is_plain_category(&spec.rows, h)
        });
    if let Some(field) = category {
        return GridColumns::Category(field.to_string());
    }

    let time_excluded = [
        keys.geo_key.as_deref(),
        keys.dimension_key.as_deref(),
        keys.value_key.as_deref(),
    ];
    let time = keys
        .time_key
        .clone()
        .or_else(|| first_time_field(spec, &headers, &time_excluded, time_sample_limit));

    match time {
        Some(field) => GridColumns::TimeBucket(field),
        None => GridColumns::Constant,
    }
}
