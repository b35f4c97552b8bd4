//! Species and date-range filtering

use crate::types::{Dataset, FilterCriteria, OccurrenceRecord};

/// Whether a single record satisfies both predicates
pub fn matches(record: &OccurrenceRecord, criteria: &FilterCriteria) -> bool {
    let species_ok = criteria
        .species_predicate()
        .map_or(true, |species| record.species == species);

    species_ok
        && criteria.date_from <= record.collection_date
        && record.collection_date <= criteria.date_to
}

/// Keep the records matching `criteria`, preserving order.
///
/// An inverted date range (`date_from > date_to`) matches nothing.
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    dataset
        .iter()
        .filter(|r| matches(r, criteria))
        .cloned()
        .collect()
}
