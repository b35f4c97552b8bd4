//! Per-process dataset cache and the request pipeline

use std::collections::HashMap;
use std::sync::Arc;

use marex_core::{pipeline, SourceMode, Selection};
use marex_db::PoolSettings;
use tokio::sync::OnceCell;
use tracing::{info, instrument, warn};

use crate::{
    DashboardView, FiltersView, LoadOutcome, MockSource, OccurrenceSource, PostgresSource,
    SourceResult,
};

/// Owns the data sources and caches one [`LoadOutcome`] per mode.
///
/// Entries are never invalidated; a new session is the only way to reload.
/// Fatal errors are not cached. Each mode has its own cell, so a slow
/// database load never holds up a mock load.
pub struct Session {
    mock: MockSource,
    database: Arc<dyn OccurrenceSource>,
    cache: HashMap<SourceMode, OnceCell<LoadOutcome>>,
}

impl Session {
    pub fn new(database: Arc<dyn OccurrenceSource>) -> Self {
        Self {
            mock: MockSource::default(),
            database,
            cache: SourceMode::ALL
                .into_iter()
                .map(|mode| (mode, OnceCell::new()))
                .collect(),
        }
    }

    pub fn with_postgres(database_url: impl Into<String>, settings: PoolSettings) -> Self {
        Self::new(Arc::new(PostgresSource::new(database_url, settings)))
    }

    /// Load `mode`, from cache when it has been loaded before
    #[instrument(skip(self))]
    pub async fn load(&self, mode: SourceMode) -> SourceResult<LoadOutcome> {
        // Concurrent callers for the same mode wait on one in-flight load.
        let outcome = self.cache[&mode]
            .get_or_try_init(|| self.load_uncached(mode))
            .await?;
        Ok(outcome.clone())
    }

    async fn load_uncached(&self, mode: SourceMode) -> SourceResult<LoadOutcome> {
        let fetched = match mode {
            SourceMode::Mock => self.mock.fetch().await,
            SourceMode::Postgres => self.database.fetch().await,
        };

        match fetched {
            Ok(dataset) => {
                info!(%mode, records = dataset.len(), "Dataset loaded");
                Ok(LoadOutcome::Loaded {
                    mode,
                    dataset: Arc::new(dataset),
                })
            }
            Err(err) if err.is_recoverable() => {
                let warning =
                    format!("Could not connect to database. Using mock data. Error: {err}");
                warn!(%mode, error = %err, "Falling back to mock dataset");
                Ok(LoadOutcome::FellBack {
                    requested: mode,
                    dataset: Arc::new(self.mock.generate()),
                    warning,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Modes currently held in the cache
    pub fn cached_modes(&self) -> Vec<SourceMode> {
        SourceMode::ALL
            .into_iter()
            .filter(|mode| self.cache[mode].initialized())
            .collect()
    }

    /// Species options and date bounds for `mode`
    pub async fn filters(&self, mode: SourceMode) -> SourceResult<FiltersView> {
        let outcome = self.load(mode).await?;
        Ok(FiltersView::from_outcome(&outcome))
    }

    /// Load, filter, and aggregate for one request.
    ///
    /// Defaults for a missing date bound come from the unfiltered dataset.
    #[instrument(skip(self))]
    pub async fn explore(&self, mode: SourceMode, selection: &Selection) -> SourceResult<DashboardView> {
        let outcome = self.load(mode).await?;
        let dataset = outcome.dataset();
        let criteria = selection.resolve(dataset);
        let output = pipeline::run(dataset, criteria);

        tracing::debug!(%mode, summary = %output.summary, "Pipeline complete");
        Ok(DashboardView::new(&outcome, output))
    }
}
