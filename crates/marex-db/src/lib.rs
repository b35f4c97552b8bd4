//! Read-only access to the species occurrence table in Postgres
//!
//! Uses the existing table as-is - NO migrations.

pub mod client;
pub mod queries;
pub mod schema;

pub use client::*;
pub use schema::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    ConnectionError(#[from] sqlx::Error),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Malformed occurrence row: {0}")]
    MalformedRow(String),
}

impl DbError {
    /// Connection and query failures, as opposed to bad data in a row
    pub fn is_unavailable(&self) -> bool {
        !matches!(self, DbError::MalformedRow(_))
    }
}

pub type DbResult<T> = Result<T, DbError>;
