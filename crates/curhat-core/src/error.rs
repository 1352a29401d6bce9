//! Error types for Curhat

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// A write to the expense store failed. Never retried internally.
    #[error("External write failed for expense {id}: {reason}")]
    ExternalWrite { id: i64, reason: String },
}

impl Error {
    /// Whether the caller should offer the user a retry
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::ExternalWrite { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
