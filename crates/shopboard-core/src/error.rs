//! Error types for shopboard-core
//!
//! Analytics reads either succeed as a whole or fail as a whole. Empty result
//! sets are not errors; the aggregations zero-default them instead.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for shopboard operations
#[derive(Error, Debug)]
pub enum CoreError {
    // ===================
    // Snapshot Errors
    // ===================
    #[error("Failed to read snapshot: {path}")]
    SnapshotRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse snapshot {path}: {message}")]
    SnapshotParse {
        path: PathBuf,
        message: String,
        #[source]
        source: serde_json::Error,
    },

    // ===================
    // Store Errors
    // ===================
    #[error("Document store query failed: {operation}")]
    Sqlite {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Malformed {collection} document {id}")]
    Document {
        collection: &'static str,
        id: String,
        #[source]
        source: serde_json::Error,
    },

    // ===================
    // Request Errors
    // ===================
    #[error("Invalid period '{given}'. Use daily, weekly, or monthly.")]
    InvalidPeriod { given: String },

    // ===================
    // Runtime Errors
    // ===================
    #[error("Aggregation task failed: {message}")]
    TaskJoin { message: String },
}

impl CoreError {
    /// Errors caused by the caller's input rather than the store
    pub fn is_validation(&self) -> bool {
        matches!(self, CoreError::InvalidPeriod { .. })
    }

    pub(crate) fn sqlite(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| CoreError::Sqlite { operation, source }
    }
}

impl From<tokio::task::JoinError> for CoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        CoreError::TaskJoin {
            message: err.to_string(),
        }
    }
}

pub type Result<T, E = CoreError> = std::result::Result<T, E>;
