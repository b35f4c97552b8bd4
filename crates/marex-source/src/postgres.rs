//! Occurrence records read from Postgres

use crate::{OccurrenceSource, SourceResult};
use marex_core::Dataset;
use marex_db::{DbClient, PoolSettings};
use tracing::{info, instrument};

/// Connects on each fetch; the session cache makes that a once-per-process cost
pub struct PostgresSource {
    database_url: String,
    settings: PoolSettings,
}

impl PostgresSource {
    pub fn new(database_url: impl Into<String>, settings: PoolSettings) -> Self {
        Self {
            database_url: database_url.into(),
            settings,
        }
    }
}

impl std::fmt::Debug for PostgresSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresSource")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl OccurrenceSource for PostgresSource {
    fn name(&self) -> &str {
        "postgres"
    }

    #[instrument(skip(self))]
    async fn fetch(&self) -> SourceResult<Dataset> {
        let client = DbClient::with_settings(&self.database_url, self.settings).await?;
        let rows = client.fetch_occurrences().await;
        client.close().await;

        let dataset: Dataset = rows?.into_iter().map(Into::into).collect();
        info!(records = dataset.len(), "Loaded occurrences from Postgres");
        Ok(dataset)
    }
}
