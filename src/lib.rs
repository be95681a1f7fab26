// Library exports for vizpick

pub mod classify;
pub mod constants;
pub mod csv_reader;
pub mod data;
pub mod drilldown;
pub mod error;
pub mod parser;
pub mod runtime;
pub mod timebucket;

// Decision pipeline stages
pub mod ir;
pub mod resolve;
pub mod select;
pub mod transform;
pub mod scale;

use serde::Deserialize;

use crate::constants::{MAX_RANKED_LIST_UNTRUNCATED, TIME_SAMPLE_LIMIT};

pub use data::{ChartKind, ChartType, DataSpec, Hints, Record, Value};
pub use drilldown::{translate, DrilldownDispatcher};
pub use error::InputError;
pub use ir::{DrilldownFilter, Payload, Rendering, VisualizationDecision};
pub use runtime::{decide, render};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOptions {
    /// Show every ranked-list entry instead of cutting at 25.
    #[serde(default)]
    pub expand_ranked_list: bool,
    #[serde(default = "default_time_sample_limit")]
    pub time_sample_limit: usize,
}

fn default_time_sample_limit() -> usize { TIME_SAMPLE_LIMIT }

impl EngineOptions {
    /// Entry cap for the ranked list, `None` when expanded.
    pub fn ranked_list_limit(&self) -> Option<usize> {
        (!self.expand_ranked_list).then_some(MAX_RANKED_LIST_UNTRUNCATED)
    }
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            expand_ranked_list: false,
            time_sample_limit: TIME_SAMPLE_LIMIT,
        }
    }
}
