//! Database client and connection management

use crate::DbResult;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Pool sizing and timeout for a [`DbClient`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 2,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Short-lived pool used for one read of the occurrence table
#[derive(Clone)]
pub struct DbClient {
    pool: PgPool,
}

impl DbClient {
    /// Connect to `database_url`, giving up after `settings.acquire_timeout`
    pub async fn with_settings(database_url: &str, settings: PoolSettings) -> DbResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
