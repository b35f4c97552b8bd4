//! Serializable dashboard payloads

use chrono::NaiveDate;
use marex_core::{
    Dataset, FilterCriteria, PipelineOutput, ScatterPoint, SourceMode, SummaryStats, TimeSeries,
};
use serde::{Deserialize, Serialize};

use crate::LoadOutcome;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

/// Selector contents for one source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FiltersView {
    pub source: SourceMode,
    pub source_label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    pub species_options: Vec<String>,
    pub date_bounds: Option<DateBounds>,
}

impl FiltersView {
    pub fn from_outcome(outcome: &LoadOutcome) -> Self {
        let dataset = outcome.dataset();
        let mode = outcome.requested();

        Self {
            source: mode,
            source_label: mode.label().to_string(),
            warning: outcome.warning().map(str::to_owned),
            species_options: dataset.species_options(),
            date_bounds: dataset
                .date_bounds()
                .map(|(min, max)| DateBounds { min, max }),
        }
    }
}

/// Everything the dashboard renders for one request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardView {
    #[serde(flatten)]
    pub filters: FiltersView,
    pub criteria: FilterCriteria,
    pub summary: SummaryStats,
    pub time_series: TimeSeries,

    /// Map layer: the filtered records
    pub occurrences: Dataset,
    pub scatter: Vec<ScatterPoint>,
}

impl DashboardView {
    pub fn new(outcome: &LoadOutcome, output: PipelineOutput) -> Self {
        let scatter = output.scatter();
        Self {
            filters: FiltersView::from_outcome(outcome),
            criteria: output.criteria,
            summary: output.summary,
            time_series: output.time_series,
            occurrences: output.filtered,
            scatter,
        }
    }
}
