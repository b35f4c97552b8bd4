//! Row types for the species occurrence table
//!
//! The projection casts every numeric column, so rows decode into these
//! types no matter which integer/float width the table declares.

use chrono::NaiveDate;
use marex_core::OccurrenceRecord;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the occurrence projection
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OccurrenceRow {
    pub species: String,
    pub latitude: f64,
    pub longitude: f64,
    pub collection_date: NaiveDate,
    pub abundance: i64,
    pub temperature: f64,
}

impl From<OccurrenceRow> for OccurrenceRecord {
    fn from(row: OccurrenceRow) -> Self {
        OccurrenceRecord {
            species: row.species,
            latitude: row.latitude,
            longitude: row.longitude,
            collection_date: row.collection_date,
            abundance: row.abundance,
            temperature: row.temperature,
        }
    }
}

/// Table names
pub mod tables {
    pub const SPECIES_OCCURRENCE: &str = "species_occurrence";
}

/// Maximum rows fetched per load
pub const OCCURRENCE_ROW_LIMIT: i64 = 5000;
