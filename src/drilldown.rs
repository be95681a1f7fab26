use indexmap::IndexMap;

use crate::data::{present, Record, Value};
use crate::ir::{DrilldownFilter, VisualizationDecision};

/// Turn a clicked row into a filter for the hosting page.
///
/// Chart primitives expose the clicked datum under different names (bar and
/// line keep the dimension field, pie slices use `name`/`value`), so the
/// value is looked up in order: the dimension, the measure, `name`, `value`.
/// Null counts as absent at every step.
pub fn translate(
    clicked: Option<&Record>,
    decision: &VisualizationDecision,
) -> Option<DrilldownFilter> {
    let row = clicked?;

    let dimension = decision
        .dimension_key()
        .or_else(|| decision.x_key())
        .map(str::to_string);

    let lookups = [
        dimension.as_deref(),
        decision.value_key(),
        Some("name"),
        Some("value"),
    ];
    let value = lookups
        .into_iter()
        .flatten()
        .find_map(|field| present(row, field))
        .cloned();

    let filters_to_apply = dimension.as_ref().map(|dim| {
        let mut filters = IndexMap::new();
        filters.insert(dim.clone(), value.clone().unwrap_or(Value::Null));
        filters
    });

    tracing::debug!(?dimension, ?value, "drilldown translated");

    Some(DrilldownFilter {
        dimension,
        value,
        filters_to_apply,
    })
}

/// A decision bound to whatever owns page-level filter state.
///
/// Without a consumer, clicks are no-ops.
pub struct DrilldownDispatcher<'a> {
    decision: &'a VisualizationDecision,
    consumer: Option<Box<dyn FnMut(&DrilldownFilter) + 'a>>,
}

impl<'a> DrilldownDispatcher<'a> {
    pub fn new(decision: &'a VisualizationDecision) -> Self {
        Self {
            decision,
            consumer: None,
        }
    }

    pub fn with_consumer<F>(mut self, consumer: F) -> Self
    where
        F: FnMut(&DrilldownFilter) + 'a,
    {
        self.consumer = Some(Box::new(consumer));
        self
    }

    pub fn has_consumer(&self) -> bool {
        self.consumer.is_some()
    }

    /// Translate a click and forward the filter to the consumer.
    pub fn click(&mut self, row: Option<&Record>) -> Option<DrilldownFilter> {
        let consumer = self.consumer.as_mut()?;
        let filter = translate(row, self.decision)?;
        consumer(&filter);
        Some(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{records_from_json, ChartKind};
    use crate::ir::{ResolvedKeys, SelectionRule};
    use serde_json::json;

    fn row(value: serde_json::Value) -> Record {
        records_from_json(&json!([value])).unwrap().remove(0)
    }

    fn decision(dimension: Option<&str>, x: Option<&str>, value: Option<&str>) -> VisualizationDecision {
        VisualizationDecision {
            kind: ChartKind::Bar,
            keys: ResolvedKeys {
                dimension_key: dimension.map(str::to_string),
                value_key: value.map(str::to_string),
                ..Default::default()
            },
            x_key: x.map(str::to_string),
            rule: SelectionRule::Fallback,
        }
    }

    #[test]
    fn test_no_row_is_noop() {
        assert_eq!(translate(None, &decision(Some("region"), None, None)), None);
    }

    #[test]
    fn test_dimension_value_and_filters() {
        let r = row(json!({"region": "north", "sales": 10}));
        let f = translate(Some(&r), &decision(Some("region"), None, Some("sales"))).unwrap();
        assert_eq!(f.dimension.as_deref(), Some("region"));
        assert_eq!(f.value, Some(Value::from("north")));
        let filters = f.filters_to_apply.unwrap();
        assert_eq!(filters.get("region"), Some(&Value::from("north")));
    }

    #[test]
    fn test_x_key_used_without_dimension() {
        let r = row(json!({"day": "2024-01-01", "visits": 3}));
        let f = translate(Some(&r), &decision(None, Some("day"), Some("visits"))).unwrap();
        assert_eq!(f.dimension.as_deref(), Some("day"));
        assert_eq!(f.value, Some(Value::from("2024-01-01")));
    }

    #[test]
    fn test_falls_back_to_value_key() {
        let r = row(json!({"region": null, "sales": 10}));
        let f = translate(Some(&r), &decision(Some("region"), None, Some("sales"))).unwrap();
        assert_eq!(f.value, Some(Value::Number(10.0)));
    }

    #[test]
    fn test_name_before_value() {
        let d = decision(None, None, None);

        let f = translate(Some(&row(json!({"name": "X"}))), &d).unwrap();
        assert_eq!(f.value, Some(Value::from("X")));
        assert_eq!(f.dimension, None);
        assert_eq!(f.filters_to_apply, None);

        let f = translate(Some(&row(json!({"name": "X", "value": 5}))), &d).unwrap();
        assert_eq!(f.value, Some(Value::from("X")));

        let f = translate(Some(&row(json!({"value": 5}))), &d).unwrap();
        assert_eq!(f.value, Some(Value::Number(5.0)));
    }

    #[test]
    fn test_nothing_found_keeps_dimension_filter() {
        let r = row(json!({"other": 1}));
        let f = translate(Some(&r), &decision(Some("region"), None, None)).unwrap();
        assert_eq!(f.value, None);
        assert_eq!(
            f.filters_to_apply.unwrap().get("region"),
            Some(&Value::Null)
        );
    }

    #[test]
    fn test_dispatcher_without_consumer_is_noop() {
        let d = decision(Some("region"), None, None);
        let mut dispatcher = DrilldownDispatcher::new(&d);
        let r = row(json!({"region": "north"}));
        assert!(!dispatcher.has_consumer());
        assert_eq!(dispatcher.click(Some(&r)), None);
    }

    #[test]
    fn test_dispatcher_forwards_filter() {
        let d = decision(Some("region"), None, None);
        let mut received = Vec::new();
        {
            let mut dispatcher =
                DrilldownDispatcher::new(&d).with_consumer(|f: &DrilldownFilter| received.push(f.clone()));
            let r = row(json!({"region": "north"}));
            assert!(dispatcher.click(Some(&r)).is_some());
            assert_eq!(dispatcher.click(None), None);
        }
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].value, Some(Value::from("north")));
    }
}
