//! Core data types for species occurrence observations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Species selector value meaning "no species predicate"
pub const ALL_SPECIES: &str = "All";

/// One observed instance of a species at a location and date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OccurrenceRecord {
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
    pub collection_date: NaiveDate,

    /// Individuals counted (non-negative)
    pub abundance: i64,

    /// Water temperature in °C
    pub temperature: f64,
}

/// Ordered collection of occurrence records
///
/// A loaded dataset is never mutated; filtering derives a new one.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Dataset {
    records: Vec<OccurrenceRecord>,
}

impl Dataset {
    pub fn new(records: Vec<OccurrenceRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[OccurrenceRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OccurrenceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Observed (min, max) collection date, `None` for an empty dataset
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().map(|r| r.collection_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Distinct species, sorted
    pub fn species(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.species.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Selector options: the `All` sentinel followed by the sorted species
    pub fn species_options(&self) -> Vec<String> {
        std::iter::once(ALL_SPECIES.to_string())
            .chain(self.species())
            .collect()
    }
}

impl FromIterator<OccurrenceRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = OccurrenceRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a OccurrenceRecord;
    type IntoIter = std::slice::Iter<'a, OccurrenceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Species and date constraints applied to a dataset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterCriteria {
    /// `None` (or the `All` sentinel) disables the species predicate
    pub species: Option<String>,
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
}

impl FilterCriteria {
    pub fn new(species: Option<String>, date_from: NaiveDate, date_to: NaiveDate) -> Self {
        Self {
            species,
            date_from,
            date_to,
        }
    }

    /// Criteria that keep every record of `dataset`
    pub fn unbounded(dataset: &Dataset) -> Self {
        Selection::default().resolve(dataset)
    }

    /// Species to match exactly, or `None` when every species passes
    pub fn species_predicate(&self) -> Option<&str> {
        self.species.as_deref().filter(|s| *s != ALL_SPECIES)
    }
}

/// Raw user input before defaults are applied
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Selection {
    pub species: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Selection {
    /// Resolve against the unfiltered dataset.
    ///
    /// Missing bounds default to the dataset's observed min/max date. An
    /// empty dataset has no bounds, so the defaults span every date.
    pub fn resolve(&self, dataset: &Dataset) -> FilterCriteria {
        let (lo, hi) = dataset
            .date_bounds()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MAX));
        let species = self
            .species
            .clone()
            .filter(|s| !s.is_empty() && s != ALL_SPECIES);

        FilterCriteria {
            species,
            date_from: self.from.unwrap_or(lo),
            date_to: self.to.unwrap_or(hi),
        }
    }
}

/// Aggregate scalars over a (filtered) dataset
///
/// Means are `None` when there are no records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SummaryStats {
    pub record_count: usize,
    pub mean_abundance: Option<f64>,
    pub mean_temperature: Option<f64>,
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<f64>| v.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}"));
        write!(
            f,
            "records={} avg_abundance={} avg_temperature={}",
            self.record_count,
            show(self.mean_abundance),
            show(self.mean_temperature)
        )
    }
}

/// One point of the mean-abundance time series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TimeSeriesPoint {
    pub date: NaiveDate,
    pub mean_abundance: f64,
}

/// Ascending by date, one point per distinct collection date
pub type TimeSeries = Vec<TimeSeriesPoint>;

/// Where a dataset comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    Mock,
    Postgres,
}

impl SourceMode {
    pub const ALL: [SourceMode; 2] = [SourceMode::Mock, SourceMode::Postgres];

    /// Human-readable label shown in the source selector
    pub fn label(self) -> &'static str {
        match self {
            SourceMode::Mock => "Mock Dataset",
            SourceMode::Postgres => "Postgres Database",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SourceMode::Mock => "mock",
            SourceMode::Postgres => "postgres",
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_date_bounds() {
        let ds = Dataset::new(vec![
            record("a", 5, 1, 20.0),
            record("b", 2, 1, 20.0),
            record("a", 9, 1, 20.0),
        ]);
        assert_eq!(ds.date_bounds(), Some((date(2022, 1, 2), date(2022, 1, 9))));
        assert_eq!(Dataset::default().date_bounds(), None);
    }

    #[test]
    fn test_species_options_sorted_with_sentinel() {
        let ds = Dataset::new(vec![
            record("Thunnus albacares", 1, 1, 20.0),
            record("Lutjanus campechanus", 2, 1, 20.0),
            record("Thunnus albacares", 3, 1, 20.0),
        ]);
        assert_eq!(
            ds.species_options(),
            vec!["All", "Lutjanus campechanus", "Thunnus albacares"]
        );
    }

    #[test]
    fn test_selection_defaults_to_observed_bounds() {
        let ds = Dataset::new(vec![record("a", 3, 1, 20.0), record("a", 7, 1, 20.0)]);
        let criteria = Selection {
            species: Some("All".into()),
            from: None,
            to: Some(date(2022, 1, 5)),
        }
        .resolve(&ds);

        assert_eq!(criteria.species, None);
        assert_eq!(criteria.date_from, date(2022, 1, 3));
        assert_eq!(criteria.date_to, date(2022, 1, 5));
    }

    #[test]
    fn test_species_predicate_ignores_sentinel() {
        let d = date(2022, 1, 1);
        assert_eq!(FilterCriteria::new(Some("All".into()), d, d).species_predicate(), None);
        assert_eq!(FilterCriteria::new(None, d, d).species_predicate(), None);
        assert_eq!(
            FilterCriteria::new(Some("x".into()), d, d).species_predicate(),
            Some("x")
        );
    }

    #[test]
    fn test_source_mode_names() {
        assert_eq!(SourceMode::Postgres.label(), "Postgres Database");
        assert_eq!(SourceMode::Mock.to_string(), "mock");
        assert_eq!(
            serde_json::to_string(&SourceMode::Postgres).unwrap(),
            "\"postgres\""
        );
        assert_eq!(
            serde_json::from_str::<SourceMode>("\"mock\"").unwrap(),
            SourceMode::Mock
        );
        assert!(serde_json::from_str::<SourceMode>("\"sqlite\"").is_err());
    }

    #[test]
    fn test_summary_display() {
        let stats = SummaryStats {
            record_count: 3,
            mean_abundance: Some(200.0),
            mean_temperature: Some(25.04),
        };
        insta::assert_snapshot!(stats.to_string(), @"records=3 avg_abundance=200.0 avg_temperature=25.0");

        let empty = SummaryStats {
            record_count: 0,
            mean_abundance: None,
            mean_temperature: None,
        };
        insta::assert_snapshot!(empty.to_string(), @"records=0 avg_abundance=n/a avg_temperature=n/a");
    }

    #[test]
    fn test_record_serde() {
        let json = r#"{"species":"Thunnus albacares","latitude":9.5,"longitude":75.25,"collection_date":"2022-01-03","abundance":120,"temperature":26.5}"#;
        let rec: OccurrenceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.collection_date, date(2022, 1, 3));
        assert_eq!(rec.abundance, 120);
    }
}
