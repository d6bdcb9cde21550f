//! Storage error types

use thiserror::Error;

/// Errors a collaborator store can report while loading classification inputs
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// A record with this id already exists
    #[error("record already exists: {0}")]
    AlreadyExists(String),

    /// Stored data could not be turned into a rule or candidate
    #[error("invalid stored data: {0}")]
    InvalidData(String),

    /// Storage backend error (database, filesystem, etc.)
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
