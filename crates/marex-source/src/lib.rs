//! Dataset sources for the marine explorer
//!
//! A source produces a [`Dataset`] of occurrence records, either generated
//! ([`MockSource`]) or read from Postgres ([`PostgresSource`]). The
//! [`Session`] loads each [`SourceMode`] at most once and falls back to the
//! mock dataset when the database cannot be reached.

pub mod mock;
pub mod postgres;
pub mod session;
pub mod view;

pub use mock::*;
pub use postgres::*;
pub use session::*;
pub use view::*;

use marex_core::{Dataset, SourceMode};
use marex_db::DbError;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Database unavailable: {0}")]
    Unavailable(DbError),

    #[error("Malformed occurrence data: {0}")]
    MalformedRow(String),
}

impl SourceError {
    /// Whether the caller may substitute the mock dataset
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SourceError::Unavailable(_))
    }
}

impl From<DbError> for SourceError {
    fn from(err: DbError) -> Self {
        if err.is_unavailable() {
            return SourceError::Unavailable(err);
        }
        match err {
            DbError::MalformedRow(msg) => SourceError::MalformedRow(msg),
            other => SourceError::MalformedRow(other.to_string()),
        }
    }
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Anything that can produce a full occurrence dataset
#[async_trait::async_trait]
pub trait OccurrenceSource: Send + Sync {
    /// Source name/identifier
    fn name(&self) -> &str;

    /// Produce the complete dataset
    async fn fetch(&self) -> SourceResult<Dataset>;
}

/// Result of loading a mode: either the requested data or the mock fallback
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded {
        mode: SourceMode,
        dataset: Arc<Dataset>,
    },
    FellBack {
        requested: SourceMode,
        dataset: Arc<Dataset>,
        warning: String,
    },
}

impl LoadOutcome {
    pub fn dataset(&self) -> &Arc<Dataset> {
        match self {
            LoadOutcome::Loaded { dataset, .. } | LoadOutcome::FellBack { dataset, .. } => dataset,
        }
    }

    /// The mode the caller asked for
    pub fn requested(&self) -> SourceMode {
        match self {
            LoadOutcome::Loaded { mode, .. } => *mode,
            LoadOutcome::FellBack { requested, .. } => *requested,
        }
    }

    pub fn warning(&self) -> Option<&str> {
        match self {
            LoadOutcome::Loaded { .. } => None,
            LoadOutcome::FellBack { warning, .. } => Some(warning),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LoadOutcome::FellBack { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_error_classification() {
        let unavailable: SourceError = DbError::ConfigError("bad url".into()).into();
        assert!(unavailable.is_recoverable());

        let malformed: SourceError = DbError::MalformedRow("null abundance".into()).into();
        assert!(!malformed.is_recoverable());
        assert!(matches!(malformed, SourceError::MalformedRow(msg) if msg == "null abundance"));
    }

    #[test]
    fn test_outcome_accessors() {
        let dataset = Arc::new(Dataset::default());
        let loaded = LoadOutcome::Loaded {
            mode: SourceMode::Mock,
            dataset: Arc::clone(&dataset),
        };
        assert_eq!(loaded.requested(), SourceMode::Mock);
        assert_eq!(loaded.warning(), None);
        assert!(!loaded.is_fallback());

        let fell_back = LoadOutcome::FellBack {
            requested: SourceMode::Postgres,
            dataset,
            warning: "no database".into(),
        };
        assert_eq!(fell_back.requested(), SourceMode::Postgres);
        assert_eq!(fell_back.warning(), Some("no database"));
        assert!(fell_back.is_fallback());
    }
}
