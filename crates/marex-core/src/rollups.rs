//! Summary statistics and time-bucketed rollups

use crate::types::{Dataset, SummaryStats, TimeSeries, TimeSeriesPoint};
use std::collections::BTreeMap;

/// Running arithmetic mean
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// `None` until at least one value has been added
    pub fn result(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl Extend<f64> for Mean {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

/// Record count plus mean abundance and temperature.
///
/// An empty dataset yields `record_count == 0` and `None` means.
pub fn summarize(dataset: &Dataset) -> SummaryStats {
    let mut abundance = Mean::default();
    let mut temperature = Mean::default();

    for record in dataset {
        abundance.add(record.abundance as f64);
        temperature.add(record.temperature);
    }

    SummaryStats {
        record_count: dataset.len(),
        mean_abundance: abundance.result(),
        mean_temperature: temperature.result(),
    }
}

/// Mean abundance per distinct collection date, ascending
pub fn time_series(dataset: &Dataset) -> TimeSeries {
    let mut groups = BTreeMap::new();
    for record in dataset {
        groups
            .entry(record.collection_date)
            .or_insert_with(Mean::default)
            .add(record.abundance as f64);
    }

    groups
        .into_iter()
        .filter_map(|(date, acc)| {
            acc.result().map(|mean_abundance| TimeSeriesPoint {
                date,
                mean_abundance,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::{date, record};

    #[test]
    fn test_mean() {
        let mut mean = Mean::default();
        mean.add(10.0);
        mean.extend([20.0, 30.0]);
        assert_eq!(mean.result(), Some(20.0));
        assert_eq!(mean.count(), 3);
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(Mean::default().result(), None);
    }

    #[test]
    fn test_summarize_hand_computed() {
        let ds = Dataset::new(vec![
            record("a", 1, 100, 24.0),
            record("a", 2, 200, 25.0),
            record("a", 3, 300, 29.0),
        ]);
        let stats = summarize(&ds);

        assert_eq!(stats.record_count, 3);
        assert_eq!(stats.mean_abundance, Some(200.0));
        assert_eq!(stats.mean_temperature, Some(26.0));
    }

    #[test]
    fn test_summarize_empty() {
        let stats = summarize(&Dataset::default());
        assert_eq!(stats.record_count, 0);
        assert_eq!(stats.mean_abundance, None);
        assert_eq!(stats.mean_temperature, None);
    }

    #[test]
    fn test_time_series_groups_same_date() {
        let ds = Dataset::new(vec![
            record("a", 4, 50, 24.0),
            record("b", 2, 100, 24.0),
            record("c", 2, 300, 24.0),
        ]);
        let series = time_series(&ds);

        assert_eq!(
            series,
            vec![
                TimeSeriesPoint {
                    date: date(2022, 1, 2),
                    mean_abundance: 200.0
                },
                TimeSeriesPoint {
                    date: date(2022, 1, 4),
                    mean_abundance: 50.0
                },
            ]
        );
    }

    #[test]
    fn test_time_series_empty() {
        assert!(time_series(&Dataset::default()).is_empty());
    }
}
