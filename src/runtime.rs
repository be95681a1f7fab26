// Engine pipeline: rows + hints -> keys -> decision -> aggregated payload

use crate::data::{ChartKind, DataSpec};
use crate::ir::{
    HeatCell, HeatGrid, HeatGridView, HeatRow, Payload, RankedEntry, RankedList, RankedListView,
    Rendering, VisualizationDecision,
};
use crate::resolve::{resolve_grid_columns, resolve_keys};
use crate::scale::{bar_fraction, normalize_intensity};
use crate::select::select;
use crate::transform::{aggregate_grid, aggregate_ranked_list};
use crate::EngineOptions;

/// Resolve keys and choose a visualization for `spec`.
pub fn decide(spec: &DataSpec, options: &EngineOptions) -> VisualizationDecision {
    let keys = resolve_keys(spec, options.time_sample_limit);
    select(spec, &keys)
}

/// Run the whole pipeline and build what the rendering host draws.
pub fn render(spec: &DataSpec, options: &EngineOptions) -> Rendering {
    let decision = decide(spec, options);
    let keys = &decision.keys;

    let payload = match decision.kind {
        ChartKind::Map => {
            let list = aggregate_ranked_list(
                &spec.rows,
                keys.geo_key.as_deref(),
                keys.value_key.as_deref(),
            );
            Payload::RankedList(ranked_list_view(list, options.ranked_list_limit()))
        }
        ChartKind::Heatmap => {
            let columns = resolve_grid_columns(spec, keys, options.time_sample_limit);
            tracing::debug!(?columns, "grid columns");
            let grid = aggregate_grid(
                &spec.rows,
                keys.geo_key.as_deref(),
                keys.value_key.as_deref(),
                &columns,
            );
            Payload::HeatGrid(heat_grid_view(grid))
        }
        ChartKind::Kpi | ChartKind::Bar | ChartKind::Line | ChartKind::Area | ChartKind::Pie => {
            Payload::Rows
        }
    };

    Rendering { decision, payload }
}

/// Cut the list for display; `limit == None` shows every entry.
pub fn ranked_list_view(list: RankedList, limit: Option<usize>) -> RankedListView {
    let total_entries = list.entries.len();
    let shown = limit.map_or(total_entries, |l| l.min(total_entries));
    let max = list.max;

    let entries = list
        .entries
        .into_iter()
        .take(shown)
        .map(|g| RankedEntry {
            width: bar_fraction(g.value, max),
            key: g.key,
            value: g.value,
        })
        .collect();

    RankedListView {
        entries,
        total_entries,
        hidden_entries: total_entries - shown,
    }
}

/// Lay the grid out row by row with per-cell intensities.
pub fn heat_grid_view(grid: HeatGrid) -> HeatGridView {
    let HeatGrid {
        columns,
        cells,
        min,
        max,
        column_source,
    } = grid;

    let rows = cells
        .into_iter()
        .map(|(geo, row)| HeatRow {
            cells: columns
                .iter()
                .map(|col| {
                    row.get(col).map(|&value| HeatCell {
                        value,
                        intensity: normalize_intensity(value, min, max),
                    })
                })
                .collect(),
            geo,
        })
        .collect();

    HeatGridView {
        columns,
        rows,
        min,
        max,
        column_source,
    }
}
