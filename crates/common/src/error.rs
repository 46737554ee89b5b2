//! Error types

use chrono::NaiveDate;
use thiserror::Error;

/// Main error type for the seller ranking engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Snapshot already exists for {period_type} period starting {period_start}")]
    DuplicatePeriod {
        period_type: String,
        period_start: NaiveDate,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
