// Syntax tree for the hint DSL

use crate::data::{ChartType, DataSpec, Hints};

/// One `|`-separated hint component.
#[derive(Debug, Clone, PartialEq)]
pub enum HintCommand {
    /// `geo(zip, state)`: candidate geographic fields, in priority order
    Geo(Vec<String>),
    /// `measure(count, revenue)`
    Measure(Vec<String>),
    /// `time(created_at)`
    Time(String),
    /// `dimension(region)` or `dim(region)`
    Dimension(String),
    /// `y(revenue)`: measure fallback when nothing numeric is found
    YKey(String),
    /// `type(pie)`: explicit override, skips classification
    Type(ChartType),
    /// `hint(heatmap)`: soft type hint
    TypeHint(ChartType),
    SingleMetric,
    Density,
}

/// Parsed hint DSL: the hints plus an optional explicit override.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HintSpec {
    pub hints: Hints,
    pub explicit_type: Option<ChartType>,
}

impl HintSpec {
    /// Fold commands left to right. Later scalar hints replace earlier ones;
    /// field lists accumulate.
    pub fn from_commands(commands: Vec<HintCommand>) -> Self {
        let mut spec = HintSpec::default();
        for command in commands {
            let hints = &mut spec.hints;
            match command {
                HintCommand::Geo(fields) => hints.geo_fields.extend(fields),
                HintCommand::Measure(fields) => hints.measure_fields.extend(fields),
                HintCommand::Time(field) => hints.time_field = Some(field),
                HintCommand::Dimension(field) => hints.dimension_field = Some(field),
                HintCommand::YKey(field) => hints.y_key = Some(field),
                HintCommand::Type(kind) => spec.explicit_type = Some(kind),
                HintCommand::TypeHint(kind) => hints.type_hint = Some(kind),
                HintCommand::SingleMetric => hints.is_single_metric = true,
                HintCommand::Density => hints.density_mode = true,
            }
        }
        spec
    }

    /// Layer these hints over a data spec's own. Lists are appended, set
    /// scalars and flags win, an explicit type replaces the existing one.
    pub fn apply_to(self, spec: &mut DataSpec) {
        let target = &mut spec.hints;
        let HintSpec { hints, explicit_type } = self;

        target.geo_fields.extend(hints.geo_fields);
        target.measure_fields.extend(hints.measure_fields);
        if hints.dimension_field.is_some() {
            target.dimension_field = hints.dimension_field;
        }
        if hints.time_field.is_some() {
            target.time_field = hints.time_field;
        }
        if hints.y_key.is_some() {
            target.y_key = hints.y_key;
        }
        if hints.type_hint.is_some() {
            target.type_hint = hints.type_hint;
        }
        target.is_single_metric |= hints.is_single_metric;
        target.density_mode |= hints.density_mode;

        if explicit_type.is_some() {
            spec.explicit_type = explicit_type;
        }
    }
}
