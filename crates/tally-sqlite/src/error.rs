//! Error types for SQLite storage backend

use tally_core::storage::StoreError;
use thiserror::Error;

/// Result type for storage operations
pub type Result<T> = std::result::Result<T, SqliteError>;

/// Errors that can occur during SQLite storage operations
#[derive(Debug, Error)]
pub enum SqliteError {
    /// Database connection or query error
    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Record with given ID already exists
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: &'static str, id: i64 },

    /// A stored column holds a value that cannot be loaded
    #[error("invalid value in {column}: {value}")]
    InvalidValue { column: &'static str, value: String },

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),
}

/// Convert SqliteError to StoreError for the storage traits
impl From<SqliteError> for StoreError {
    fn from(err: SqliteError) -> Self {
        match err {
            SqliteError::AlreadyExists { kind, id } => {
                StoreError::AlreadyExists(format!("{} {}", kind, id))
            }
            SqliteError::InvalidValue { column, value } => {
                StoreError::InvalidData(format!("{}: {}", column, value))
            }
            SqliteError::Database(e) => StoreError::Backend(format!("SQLite: {}", e)),
            SqliteError::Migration(msg) => StoreError::Backend(format!("Migration: {}", msg)),
        }
    }
}
