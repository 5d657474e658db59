//! Error types for the storage layer.

use doi_core::JournalId;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection or query error.
    #[error("database error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Journal not found (raised by update on a vanished record).
    #[error("journal not found: {0}")]
    JournalNotFound(JournalId),

    /// Migration error.
    #[error("migration error: {0}")]
    MigrationError(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Lock on the in-memory store was poisoned.
    #[error("store lock poisoned")]
    LockPoisoned,
}
