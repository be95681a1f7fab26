use crate::classify::{category_cardinality, has_numeric_value, is_geo_field, is_numeric_field};
use crate::constants::BAR_CATEGORY_CARDINALITY_MAX;
use crate::data::{ChartKind, ChartType, DataSpec};
use crate::ir::{ResolvedKeys, SelectionRule, VisualizationDecision};

/// Everything a rule may look at.
struct SelectionContext<'a> {
    spec: &'a DataSpec,
    keys: &'a ResolvedKeys,
}

type RuleFn = fn(&SelectionContext) -> Option<ChartKind>;

/// Evaluated top to bottom; the first rule returning a kind wins.
///
/// The order is the priority: a manual override escapes every heuristic; a
/// single value is degenerate and becomes a tile; time and geography carry
/// more information than a generic category; density is opt-in; a small
/// categorical breakdown is the most specific remaining choice.
const RULES: [(SelectionRule, RuleFn); 7] = [
    (SelectionRule::ExplicitOverride, explicit_override),
    (SelectionRule::SingleValue, single_value),
    (SelectionRule::TimeSeries, time_series),
    (SelectionRule::Geographic, geographic),
    (SelectionRule::Density, density),
    (SelectionRule::Categorical, categorical),
    (SelectionRule::Fallback, fallback),
];

fn explicit_override(ctx: &SelectionContext) -> Option<ChartKind> {
    ctx.spec.explicit_type.and_then(ChartType::kind)
}

fn single_value(ctx: &SelectionContext) -> Option<ChartKind> {
    let single = ctx.spec.hints.is_single_metric
        || ctx.spec.rows.len() == 1
        || (measure_count(ctx.spec, ctx.keys) == 1 && !has_grouping_key(ctx.keys));
    single.then_some(ChartKind::Kpi)
}

/// A lone measure split by geography or time is still a series, not a tile.
fn has_grouping_key(keys: &ResolvedKeys) -> bool {
    keys.dimension_key.is_some() || keys.geo_key.is_some() || keys.time_key.is_some()
}

fn time_series(ctx: &SelectionContext) -> Option<ChartKind> {
    ctx.keys.time_key.as_ref().map(|_| ChartKind::Line)
}

fn geographic(ctx: &SelectionContext) -> Option<ChartKind> {
    ctx.keys.geo_key.as_ref().map(|_| ChartKind::Map)
}

fn density(ctx: &SelectionContext) -> Option<ChartKind> {
    let hints = &ctx.spec.hints;
    (hints.density_mode || hints.type_hint == Some(ChartType::Heatmap))
        .then_some(ChartKind::Heatmap)
}

fn categorical(ctx: &SelectionContext) -> Option<ChartKind> {
    let dim = ctx.keys.dimension_key.as_deref()?;
    let cardinality = category_cardinality(&ctx.spec.rows, dim);
    let numeric_value = ctx
        .keys
        .value_key
        .as_deref()
        .is_some_and(|v| is_numeric_field(&ctx.spec.rows, v));

    (cardinality > 0 && cardinality < BAR_CATEGORY_CARDINALITY_MAX && numeric_value)
        .then_some(ChartKind::Bar)
}

fn fallback(_ctx: &SelectionContext) -> Option<ChartKind> {
    Some(ChartKind::Bar)
}

/// Number of measures in play: the hinted measures when given, otherwise
/// the first row's numeric fields that play no other role.
pub fn measure_count(spec: &DataSpec, keys: &ResolvedKeys) -> usize {
    if !spec.hints.measure_fields.is_empty() {
        return spec.hints.measure_fields.len();
    }

    let roles = [
        keys.geo_key.as_deref(),
        keys.time_key.as_deref(),
        keys.dimension_key.as_deref(),
    ];
    spec.sample_headers()
        .into_iter()
        .filter(|h| !roles.iter().flatten().any(|r| r == h))
        .filter(|h| !is_geo_field(h, &spec.hints.geo_fields))
        .filter(|h| is_numeric_field(&spec.rows, h) && has_numeric_value(&spec.rows, h))
        .count()
}

/// Field on the primary axis of `kind`.
fn x_key_for(kind: ChartKind, keys: &ResolvedKeys) -> Option<String> {
    match kind {
        ChartKind::Line | ChartKind::Area => keys.time_key.clone().or(keys.dimension_key.clone()),
        ChartKind::Map | ChartKind::Heatmap => keys.geo_key.clone(),
        ChartKind::Kpi | ChartKind::Bar | ChartKind::Pie => keys.dimension_key.clone(),
    }
}

/// Choose a visualization. Pure: the same inputs always give the same decision.
pub fn select(spec: &DataSpec, keys: &ResolvedKeys) -> VisualizationDecision {
    let ctx = SelectionContext { spec, keys };

    let (rule, kind) = RULES
        .iter()
        .find_map(|(rule, applies)| applies(&ctx).map(|kind| (*rule, kind)))
        .unwrap_or((SelectionRule::Fallback, ChartKind::Bar));

    tracing::debug!(%kind, ?rule, rows = spec.rows.len(), "selected visualization");

    VisualizationDecision {
        kind,
        keys: keys.clone(),
        x_key: x_key_for(kind, keys),
        rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TIME_SAMPLE_LIMIT;
    use crate::data::{records_from_json, Hints};
    use crate::resolve::resolve_keys;
    use serde_json::json;

    fn spec(value: serde_json::Value) -> DataSpec {
        DataSpec::new(records_from_json(&value).unwrap())
    }

    fn decide(spec: &DataSpec) -> VisualizationDecision {
        let keys = resolve_keys(spec, TIME_SAMPLE_LIMIT);
        select(spec, &keys)
    }

    fn two_measures_by_region() -> DataSpec {
        spec(json!([
            {"region": "north", "sales": 10, "cost": 4},
            {"region": "south", "sales": 12, "cost": 5},
            {"region": "east", "sales": 7, "cost": 3}
        ]))
    }

    #[test]
    fn test_explicit_override_wins() {
        let s = spec(json!([{"zip": "77001", "n": 1}])).with_explicit_type(ChartType::Pie);
        let d = decide(&s);
        assert_eq!(d.kind, ChartKind::Pie);
        assert_eq!(d.rule, SelectionRule::ExplicitOverride);
    }

    #[test]
    fn test_auto_does_not_override() {
        let s = spec(json!([{"zip": "77001", "n": 1}])).with_explicit_type(ChartType::Auto);
        assert_eq!(decide(&s).kind, ChartKind::Kpi);
    }

    #[test]
    fn test_single_row_is_kpi() {
        let d = decide(&spec(json!([{"day": "2024-01-01", "zip": "77001", "n": 1}])));
        assert_eq!(d.kind, ChartKind::Kpi);
        assert_eq!(d.rule, SelectionRule::SingleValue);
    }

    #[test]
    fn test_single_metric_flag_is_kpi() {
        let s = two_measures_by_region().with_hints(Hints {
            is_single_metric: true,
            ..Default::default()
        });
        assert_eq!(decide(&s).kind, ChartKind::Kpi);
    }

    #[test]
    fn test_one_measure_without_dimension_is_kpi() {
        let s = spec(json!([{"label": "a", "total": 1}, {"label": "b", "total": 2}]));
        assert_eq!(decide(&s).kind, ChartKind::Kpi);
    }

    #[test]
    fn test_one_measure_over_time_is_line() {
        let s = spec(json!([
            {"day": "2024-01-01", "visits": 1},
            {"day": "2024-01-02", "visits": 3},
            {"day": "2024-01-03", "visits": 2}
        ]));
        let d = decide(&s);
        assert_eq!(d.kind, ChartKind::Line);
        assert_eq!(d.rule, SelectionRule::TimeSeries);
    }

    #[test]
    fn test_time_key_is_line() {
        let s = spec(json!([
            {"day": "2024-01-01", "zip": "77001", "a": 1, "b": 2},
            {"day": "2024-01-02", "zip": "77002", "a": 3, "b": 4},
            {"day": "2024-01-03", "zip": "77003", "a": 5, "b": 6}
        ]));
        let d = decide(&s);
        assert_eq!(d.kind, ChartKind::Line);
        assert_eq!(d.x_key.as_deref(), Some("day"));
    }

    #[test]
    fn test_geo_key_is_map() {
        let s = spec(json!([{"zip": "77001", "count": 12}, {"zip": "77002", "count": 5}]))
            .with_hints(Hints {
                geo_fields: vec!["zip".to_string()],
                measure_fields: vec!["count".to_string()],
                ..Default::default()
            });
        let d = decide(&s);
        assert_eq!(d.kind, ChartKind::Map);
        assert_eq!(d.x_key.as_deref(), Some("zip"));
    }

    #[test]
    fn test_density_mode_is_heatmap() {
        let s = two_measures_by_region().with_hints(Hints {
            density_mode: true,
            ..Default::default()
        });
        assert_eq!(decide(&s).kind, ChartKind::Heatmap);

        let s = two_measures_by_region().with_hints(Hints {
            type_hint: Some(ChartType::Heatmap),
            ..Default::default()
        });
        assert_eq!(decide(&s).rule, SelectionRule::Density);
    }

    #[test]
    fn test_small_dimension_is_categorical_bar() {
        let s = two_measures_by_region().with_hints(Hints {
            dimension_field: Some("region".to_string()),
            ..Default::default()
        });
        let d = decide(&s);
        assert_eq!(d.kind, ChartKind::Bar);
        assert_eq!(d.rule, SelectionRule::Categorical);
        assert_eq!(d.x_key.as_deref(), Some("region"));
    }

    fn categories(distinct: usize) -> DataSpec {
        let rows: Vec<serde_json::Value> = (0..distinct)
            .map(|i| json!({"cat": format!("c{}", i), "v": i}))
            .collect();
        spec(serde_json::Value::Array(rows)).with_hints(Hints {
            dimension_field: Some("cat".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_nine_categories_are_categorical_bar() {
        let d = decide(&categories(9));
        assert_eq!(d.kind, ChartKind::Bar);
        assert_eq!(d.rule, SelectionRule::Categorical);
    }

    #[test]
    fn test_ten_categories_fall_back() {
        let d = decide(&categories(10));
        assert_eq!(d.kind, ChartKind::Bar);
        assert_eq!(d.rule, SelectionRule::Fallback);
    }

    #[test]
    fn test_no_signal_falls_back_to_bar() {
        let d = decide(&two_measures_by_region());
        assert_eq!(d.kind, ChartKind::Bar);
        assert_eq!(d.rule, SelectionRule::Fallback);
    }

    #[test]
    fn test_empty_rows_fall_back_to_bar() {
        let d = decide(&DataSpec::default());
        assert_eq!(d.kind, ChartKind::Bar);
        assert_eq!(d.keys, ResolvedKeys::default());
    }

    #[test]
    fn test_measure_count() {
        let s = two_measures_by_region();
        let keys = resolve_keys(&s, TIME_SAMPLE_LIMIT);
        assert_eq!(measure_count(&s, &keys), 2);
    }
}
