use proptest::prelude::*;
use vizpick::scale::normalize_intensity;
use vizpick::transform::aggregate_ranked_list;
use vizpick::{decide, render, ChartKind, ChartType, DataSpec, EngineOptions, Record, Value};

const FIELDS: [&str; 8] = ["zip", "state", "day", "region", "count", "amount", "name", "value"];

fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1.0e6..1.0e6f64).prop_map(Value::Number),
        "[a-z0-9 ]{0,6}".prop_map(Value::Text),
        (1u32..=28, 1u32..=12).prop_map(|(d, m)| Value::Text(format!("2024-{:02}-{:02}", m, d))),
    ]
}

prop_compose! {
    /// A row holding a random subset of the shared field pool
    fn arb_row()(cells in prop::collection::vec((0..FIELDS.len(), arb_value()), 0..6)) -> Record {
        cells
            .into_iter()
            .map(|(i, v)| (FIELDS[i].to_string(), v))
            .collect()
    }
}

prop_compose! {
    fn arb_rows()(rows in prop::collection::vec(arb_row(), 0..40)) -> Vec<Record> {
        rows
    }
}

fn arb_chart_type() -> impl Strategy<Value = ChartType> {
    prop_oneof![
        Just(ChartType::Kpi),
        Just(ChartType::Bar),
        Just(ChartType::Line),
        Just(ChartType::Area),
        Just(ChartType::Pie),
        Just(ChartType::Map),
        Just(ChartType::Heatmap),
    ]
}

proptest! {
    /// Property: the same input always yields the same decision and payload
    #[test]
    fn prop_decision_is_deterministic(rows in arb_rows()) {
        let spec = DataSpec::new(rows);
        let options = EngineOptions::default();
        prop_assert_eq!(decide(&spec, &options), decide(&spec.clone(), &options));
        prop_assert_eq!(render(&spec, &options), render(&spec, &options));
    }

    /// Property: a non-auto explicit type is returned unchanged
    #[test]
    fn prop_explicit_type_wins(rows in arb_rows(), chart_type in arb_chart_type()) {
        let spec = DataSpec::new(rows).with_explicit_type(chart_type);
        let decision = decide(&spec, &EngineOptions::default());
        prop_assert_eq!(Some(decision.kind), chart_type.kind());
    }

    /// Property: exactly one row without an override is a kpi tile
    #[test]
    fn prop_single_row_is_kpi(row in arb_row()) {
        let spec = DataSpec::new(vec![row]);
        prop_assert_eq!(decide(&spec, &EngineOptions::default()).kind, ChartKind::Kpi);
    }

    /// Property: intensities stay within [0.2, 1.0]
    #[test]
    fn prop_intensity_bounds(a in -1.0e9..1.0e9f64, b in -1.0e9..1.0e9f64, v in -1.0e9..1.0e9f64) {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        let t = normalize_intensity(v, min, max);
        prop_assert!((0.2..=1.0).contains(&t));
    }

    /// Property: ranked totals are sorted and conserve the summed measure
    #[test]
    fn prop_ranked_list_sorted_and_conserving(rows in arb_rows()) {
        let list = aggregate_ranked_list(&rows, Some("zip"), Some("count"));
        for pair in list.entries.windows(2) {
            prop_assert!(pair[0].value >= pair[1].value);
        }

        let expected: f64 = rows
            .iter()
            .filter(|r| r.get("zip").is_some_and(|v| !v.is_null()))
            .map(|r| vizpick::classify::measure_of(r, Some("count")))
            .sum();
        let total: f64 = list.entries.iter().map(|g| g.value).sum();
        prop_assert!((expected - total).abs() <= 1e-6 * expected.abs().max(1.0));

        let max = list.entries.first().map(|g| g.value).unwrap_or(0.0);
        prop_assert_eq!(list.max, max);
    }
}
