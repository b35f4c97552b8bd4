//! Query operations for the species occurrence table

use crate::schema::{OccurrenceRow, OCCURRENCE_ROW_LIMIT};
use crate::{DbClient, DbError, DbResult};
use tracing::{debug, instrument};

const SELECT_OCCURRENCES: &str = r#"
    SELECT
        species::TEXT AS species,
        latitude::DOUBLE PRECISION AS latitude,
        longitude::DOUBLE PRECISION AS longitude,
        collection_date::DATE AS collection_date,
        abundance::BIGINT AS abundance,
        temperature::DOUBLE PRECISION AS temperature
    FROM species_occurrence
    LIMIT $1
"#;

/// SQLSTATE class 22: data exception (bad cast, numeric overflow, ...)
const DATA_EXCEPTION_CLASS: &str = "22";

/// Split bad data (client decode or server-side cast failure) from
/// connection/query failures
fn classify(err: sqlx::Error) -> DbError {
    match err {
        sqlx::Error::ColumnDecode { index, source } => {
            DbError::MalformedRow(format!("column {index}: {source}"))
        }
        sqlx::Error::Decode(source) => DbError::MalformedRow(source.to_string()),
        sqlx::Error::Database(db_err)
            if db_err
                .code()
                .is_some_and(|code| code.starts_with(DATA_EXCEPTION_CLASS)) =>
        {
            DbError::MalformedRow(db_err.message().to_string())
        }
        other => DbError::ConnectionError(other),
    }
}

impl DbClient {
    /// Fetch up to [`OCCURRENCE_ROW_LIMIT`] occurrence rows
    #[instrument(skip(self))]
    pub async fn fetch_occurrences(&self) -> DbResult<Vec<OccurrenceRow>> {
        self.fetch_occurrences_limit(OCCURRENCE_ROW_LIMIT).await
    }

    /// Fetch up to `limit` occurrence rows
    #[instrument(skip(self))]
    pub async fn fetch_occurrences_limit(&self, limit: i64) -> DbResult<Vec<OccurrenceRow>> {
        let rows = sqlx::query_as::<_, OccurrenceRow>(SELECT_OCCURRENCES)
            .bind(limit)
            .fetch_all(self.pool())
            .await
            .map_err(classify)?;

        debug!("Retrieved {} occurrence rows (limit {})", rows.len(), limit);
        Ok(rows)
    }
}
