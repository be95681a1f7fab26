// Decision thresholds and display policy.
//
// The two category limits below look alike but are separate knobs: the bar
// rule uses an exclusive 10, heat-grid column detection an inclusive 12.

/// Field names treated as geographic.
pub const GEO_VOCABULARY: [&str; 9] = [
    "zip",
    "zipcode",
    "cbsa",
    "state",
    "city",
    "lat",
    "lng",
    "latitude",
    "longitude",
];

/// Leading rows inspected when probing a field for dates.
pub const TIME_SAMPLE_LIMIT: usize = 20;

/// Parsed dates required before a field counts as time (capped by row count).
pub const TIME_MIN_CORROBORATING_SAMPLES: usize = 3;

/// Bar rule: dimension cardinality must be strictly below this.
pub const BAR_CATEGORY_CARDINALITY_MAX: usize = 10;

/// Heat-grid category columns: distinct count in `[MIN, MAX]`, both inclusive.
pub const HEATMAP_CATEGORY_CARDINALITY_MIN: usize = 1;
pub const HEATMAP_CATEGORY_CARDINALITY_MAX: usize = 12;

/// Ranked-list entries shown before the expand affordance.
pub const MAX_RANKED_LIST_UNTRUNCATED: usize = 25;

/// Heat-grid cell intensity bounds.
pub const INTENSITY_FLOOR: f64 = 0.2;
pub const INTENSITY_CEILING: f64 = 1.0;

/// Column label used when a grid has neither category nor time columns.
pub const GRID_CONSTANT_COLUMN: &str = "Value";
