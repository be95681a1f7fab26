use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::InputError;

/// A single scalar cell. An absent field is represented by the lookup
/// returning `None`, not by a variant here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null and whitespace-only text carry no data.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// String form used for group keys and distinct counts. Null has none.
    pub fn label(&self) -> Option<String> {
        match self {
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Ordered field name -> value mapping for one row.
pub type Record = IndexMap<String, Value>;

/// Present (non-null) value of `key` in `row`.
pub fn present<'a>(row: &'a Record, key: &str) -> Option<&'a Value> {
    row.get(key).filter(|v| !v.is_null())
}

/// Requested chart type. `Auto` leaves the choice to the selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Auto,
    Kpi,
    Bar,
    Line,
    Area,
    Pie,
    Map,
    Heatmap,
}

impl ChartType {
    /// The concrete kind this request pins, if any.
    pub fn kind(self) -> Option<ChartKind> {
        match self {
            ChartType::Auto => None,
            ChartType::Kpi => Some(ChartKind::Kpi),
            ChartType::Bar => Some(ChartKind::Bar),
            ChartType::Line => Some(ChartKind::Line),
            ChartType::Area => Some(ChartKind::Area),
            ChartType::Pie => Some(ChartKind::Pie),
            ChartType::Map => Some(ChartKind::Map),
            ChartType::Heatmap => Some(ChartKind::Heatmap),
        }
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(ChartType::Auto),
            "kpi" => Ok(ChartType::Kpi),
            "bar" => Ok(ChartType::Bar),
            "line" => Ok(ChartType::Line),
            "area" => Ok(ChartType::Area),
            "pie" => Ok(ChartType::Pie),
            "map" => Ok(ChartType::Map),
            "heatmap" => Ok(ChartType::Heatmap),
            other => Err(format!(
                "unknown chart type '{}' (expected auto, kpi, bar, line, area, pie, map or heatmap)",
                other
            )),
        }
    }
}

/// A decided visualization variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Kpi,
    Bar,
    Line,
    Area,
    Pie,
    Map,
    Heatmap,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChartKind::Kpi => "kpi",
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Pie => "pie",
            ChartKind::Map => "map",
            ChartKind::Heatmap => "heatmap",
        };
        f.write_str(name)
    }
}

/// Explicit field names and flags supplied by the hosting page.
/// Anything left empty is filled in by heuristics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hints {
    pub dimension_field: Option<String>,
    pub time_field: Option<String>,
    pub geo_fields: Vec<String>,
    pub measure_fields: Vec<String>,
    pub y_key: Option<String>,
    pub type_hint: Option<ChartType>,
    pub is_single_metric: bool,
    pub density_mode: bool,
}

/// Rows plus rendering hints for one chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSpec {
    pub rows: Vec<Record>,
    pub explicit_type: Option<ChartType>,
    pub hints: Hints,
}

impl DataSpec {
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn with_hints(mut self, hints: Hints) -> Self {
        self.hints = hints;
        self
    }

    pub fn with_explicit_type(mut self, chart_type: ChartType) -> Self {
        self.explicit_type = Some(chart_type);
        self
    }

    /// Field names of the first row, in declaration order.
    pub fn sample_headers(&self) -> Vec<&str> {
        self.rows
            .first()
            .map(|row| row.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Convert a JSON array of flat objects into records.
pub fn records_from_json(value: &JsonValue) -> Result<Vec<Record>, InputError> {
    let array = value.as_array().ok_or(InputError::NotAnArray)?;

    let mut rows = Vec::with_capacity(array.len());
    for (index, item) in array.iter().enumerate() {
        let obj = item
            .as_object()
            .ok_or(InputError::NotAnObject { index })?;

        let mut row = Record::with_capacity(obj.len());
        for (field, raw) in obj {
            let val = match raw {
                JsonValue::Null => Value::Null,
                JsonValue::Bool(b) => Value::Bool(*b),
                JsonValue::Number(n) => match n.as_f64() {
                    Some(f) => Value::Number(f),
                    None => Value::Text(n.to_string()),
                },
                JsonValue::String(s) => Value::Text(s.clone()),
                JsonValue::Array(_) | JsonValue::Object(_) => {
                    return Err(InputError::NestedValue {
                        index,
                        field: field.clone(),
                    })
                }
            };
            row.insert(field.clone(), val);
        }
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_from_json_keeps_order_and_types() {
        let rows = records_from_json(&json!([
            {"zip": "77001", "count": 12, "ok": true, "note": null}
        ]))
        .unwrap();
        assert_eq!(rows.len(), 1);
        let keys: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zip", "count", "ok", "note"]);
        assert_eq!(rows[0]["count"], Value::Number(12.0));
        assert_eq!(rows[0]["note"], Value::Null);
    }

    #[test]
    fn test_records_from_json_empty_array() {
        let rows = records_from_json(&json!([])).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_records_from_json_rejects_shapes() {
        assert!(matches!(
            records_from_json(&json!({"a": 1})),
            Err(InputError::NotAnArray)
        ));
        assert!(matches!(
            records_from_json(&json!([{"a": 1}, 3])),
            Err(InputError::NotAnObject { index: 1 })
        ));
        assert!(matches!(
            records_from_json(&json!([{"a": [1, 2]}])),
            Err(InputError::NestedValue { index: 0, .. })
        ));
    }

    #[test]
    fn test_value_label() {
        assert_eq!(Value::Number(12.0).label(), Some("12".to_string()));
        assert_eq!(Value::Number(3.5).label(), Some("3.5".to_string()));
        assert_eq!(Value::Null.label(), None);
        assert!(Value::Text("  ".into()).is_blank());
    }

    #[test]
    fn test_chart_type_from_str() {
        assert_eq!("Heatmap".parse::<ChartType>().unwrap(), ChartType::Heatmap);
        assert_eq!(ChartType::Auto.kind(), None);
        assert_eq!(ChartType::Pie.kind(), Some(ChartKind::Pie));
        assert!("scatter".parse::<ChartType>().is_err());
    }

    #[test]
    fn test_data_spec_deserializes_camel_case() {
        let spec: DataSpec = serde_json::from_value(json!({
            "rows": [{"zip": "77001", "count": 12}],
            "explicitType": "auto",
            "hints": {"geoFields": ["zip"], "measureFields": ["count"], "isSingleMetric": false}
        }))
        .unwrap();
        assert_eq!(spec.rows.len(), 1);
        assert_eq!(spec.explicit_type, Some(ChartType::Auto));
        assert_eq!(spec.hints.geo_fields, vec!["zip"]);
        assert_eq!(spec.sample_headers(), vec!["zip", "count"]);
    }
}
