use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::classify::measure_of;
use crate::constants::GRID_CONSTANT_COLUMN;
use crate::data::{present, Record};
use crate::ir::{AggregatedGroup, GridColumns, HeatGrid, RankedList};
use crate::timebucket::bucket_to_day_label;

/// Sum `value_key` per geo label, largest total first.
///
/// Missing or non-numeric measures contribute 0. Rows without a geo value
/// have nothing to group under and are skipped. Ties keep first-seen order.
pub fn aggregate_ranked_list(
    rows: &[Record],
    geo_key: Option<&str>,
    value_key: Option<&str>,
) -> RankedList {
    let Some(geo_key) = geo_key else {
        return RankedList::default();
    };

    let mut totals: IndexMap<String, f64> = IndexMap::new();
    let mut skipped = 0usize;
    for row in rows {
        let Some(label) = present(row, geo_key).and_then(|v| v.label()) else {
            skipped += 1;
            continue;
        };
        *totals.entry(label).or_insert(0.0) += measure_of(row, value_key);
    }
    if skipped > 0 {
        tracing::warn!(
            skipped,
            geo_key,
            "rows without a geo value left out of the ranked list"
        );
    }

    let mut entries: Vec<AggregatedGroup> = totals
        .into_iter()
        .map(|(key, value)| AggregatedGroup { key, value })
        .collect();
    // `sort_by` is stable, so equal totals stay in input order.
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));

    let max = entries.first().map(|g| g.value).unwrap_or(0.0);
    tracing::debug!(groups = entries.len(), max, "ranked list aggregated");

    RankedList { entries, max }
}

/// Two-level geo x column sums for the heat-grid.
///
/// Rows whose column cannot be determined (an unparseable date, a missing
/// category) are dropped rather than bucketed somewhere synthetic.
pub fn aggregate_grid(
    rows: &[Record],
    geo_key: Option<&str>,
    value_key: Option<&str>,
    columns: &GridColumns,
) -> HeatGrid {
    let Some(geo_key) = geo_key else {
        return HeatGrid::empty(columns.clone());
    };

    let mut cells: IndexMap<String, IndexMap<String, f64>> = IndexMap::new();
    let mut seen_columns: BTreeSet<String> = BTreeSet::new();

    let mut skipped = 0usize;
    for row in rows {
        let Some(geo) = present(row, geo_key).and_then(|v| v.label()) else {
            skipped += 1;
            continue;
        };
        let Some(column) = column_label(row, columns) else {
            skipped += 1;
            continue;
        };

        seen_columns.insert(column.clone());
        *cells
            .entry(geo)
            .or_default()
            .entry(column)
            .or_insert(0.0) += measure_of(row, value_key);
    }

    if skipped > 0 {
        tracing::warn!(
            skipped,
            geo_key,
            ?columns,
            "rows without a geo value or column left out of the heat grid"
        );
    }

    // Range over every written cell.
    let (min, max) = cells
        .values()
        .flat_map(|row| row.values().copied())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
        .unwrap_or((0.0, 0.0));

    tracing::debug!(
        rows = cells.len(),
        columns = seen_columns.len(),
        min,
        max,
        "heat grid aggregated"
    );

    HeatGrid {
        columns: seen_columns.into_iter().collect(),
        cells,
        min,
        max,
        column_source: columns.clone(),
    }
}

fn column_label(row: &Record, columns: &GridColumns) -> Option<String> {
    match columns {
        GridColumns::Category(field) => present(row, field).and_then(|v| v.label()),
        GridColumns::TimeBucket(field) => row.get(field).and_then(bucket_to_day_label),
        GridColumns::Constant => Some(GRID_CONSTANT_COLUMN.to_string()),
    }
}
