//! One filter-and-aggregate pass over a loaded dataset

use serde::{Deserialize, Serialize};

use crate::filter::filter;
use crate::rollups::{summarize, time_series};
use crate::types::{Dataset, FilterCriteria, SummaryStats, TimeSeries};

/// Everything derived from a dataset for one set of criteria
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    pub criteria: FilterCriteria,
    pub filtered: Dataset,
    pub summary: SummaryStats,
    pub time_series: TimeSeries,
}

/// Abundance against temperature for one record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScatterPoint {
    pub temperature: f64,
    pub abundance: i64,
    pub species: String,
}

impl PipelineOutput {
    pub fn scatter(&self) -> Vec<ScatterPoint> {
        self.filtered
            .iter()
            .map(|r| ScatterPoint {
                temperature: r.temperature,
                abundance: r.abundance,
                species: r.species.clone(),
            })
            .collect()
    }
}

/// Filter `dataset` by `criteria`, then summarize and bucket the result
pub fn run(dataset: &Dataset, criteria: FilterCriteria) -> PipelineOutput {
    let filtered = filter(dataset, &criteria);
    let summary = summarize(&filtered);
    let time_series = time_series(&filtered);

    PipelineOutput {
        criteria,
        filtered,
        summary,
        time_series,
    }
}
