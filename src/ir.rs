use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::data::{ChartKind, Value};

// =============================================================================
// Phase 1: Resolution
// =============================================================================

/// Field names playing each semantic role. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedKeys {
    pub geo_key: Option<String>,
    pub time_key: Option<String>,
    pub dimension_key: Option<String>,
    pub value_key: Option<String>,
}

/// Where the columns of a heat-grid come from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", content = "field", rename_all = "camelCase")]
pub enum GridColumns {
    /// Raw values of a low-cardinality field.
    Category(String),
    /// Day buckets of a date field.
    TimeBucket(String),
    /// A single literal `"Value"` column.
    Constant,
}

// =============================================================================
// Phase 2: Selection
// =============================================================================

/// The selector rule that produced a decision, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectionRule {
    ExplicitOverride,
    SingleValue,
    TimeSeries,
    Geographic,
    Density,
    Categorical,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualizationDecision {
    pub kind: ChartKind,
    pub keys: ResolvedKeys,
    /// Field driving the primary axis of the chosen kind.
    pub x_key: Option<String>,
    pub rule: SelectionRule,
}

impl VisualizationDecision {
    pub fn dimension_key(&self) -> Option<&str> {
        self.keys.dimension_key.as_deref()
    }

    pub fn value_key(&self) -> Option<&str> {
        self.keys.value_key.as_deref()
    }

    pub fn x_key(&self) -> Option<&str> {
        self.x_key.as_deref()
    }
}

// =============================================================================
// Phase 3: Aggregation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedGroup {
    pub key: String,
    pub value: f64,
}

/// Geo totals sorted by value, largest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankedList {
    pub entries: Vec<AggregatedGroup>,
    pub max: f64,
}

/// Geo label -> column label -> summed value, plus the range over all cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatGrid {
    pub columns: Vec<String>,
    pub cells: IndexMap<String, IndexMap<String, f64>>,
    pub min: f64,
    pub max: f64,
    pub column_source: GridColumns,
}

impl HeatGrid {
    pub fn empty(column_source: GridColumns) -> Self {
        Self {
            columns: Vec::new(),
            cells: IndexMap::new(),
            min: 0.0,
            max: 0.0,
            column_source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, geo: &str, column: &str) -> Option<f64> {
        self.cells.get(geo).and_then(|row| row.get(column)).copied()
    }
}

// =============================================================================
// Phase 4: Output
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedEntry {
    pub key: String,
    pub value: f64,
    /// Share of the largest total, for the proportional bar.
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedListView {
    pub entries: Vec<RankedEntry>,
    pub total_entries: usize,
    pub hidden_entries: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatCell {
    pub value: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatRow {
    pub geo: String,
    /// One slot per grid column; `None` where no row landed.
    pub cells: Vec<Option<HeatCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeatGridView {
    pub columns: Vec<String>,
    pub rows: Vec<HeatRow>,
    pub min: f64,
    pub max: f64,
    pub column_source: GridColumns,
}

/// What the rendering host needs besides the decision itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Payload {
    RankedList(RankedListView),
    HeatGrid(HeatGridView),
    /// Kinds drawn straight from the rows.
    Rows,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rendering {
    pub decision: VisualizationDecision,
    pub payload: Payload,
}

// =============================================================================
// Interaction
// =============================================================================

/// Filter handed back to the hosting page after a click.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrilldownFilter {
    pub dimension: Option<String>,
    pub value: Option<Value>,
    pub filters_to_apply: Option<IndexMap<String, Value>>,
}
