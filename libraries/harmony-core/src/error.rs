/// Core error types for Harmony
use crate::types::{PlaylistId, SongId};
use thiserror::Error;

/// Result type alias using `HarmonyError`
pub type Result<T> = std::result::Result<T, HarmonyError>;

/// Core error type for Harmony
#[derive(Error, Debug)]
pub enum HarmonyError {
    /// Entity not found (or not visible to the acting user)
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Playlist not found, or owned by somebody else
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Song not found
    #[error("Song not found: {0}")]
    SongNotFound(SongId),

    /// Malformed or inconsistent request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A foreign key the operation depends on does not exist
    #[error("Referential error: {0}")]
    Referential(String),

    /// The transaction could not be started or committed; retry the whole operation
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),

    /// Duplicate entry (unique constraint)
    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl HarmonyError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a transaction failure from any displayable cause
    pub fn transaction(cause: impl std::fmt::Display) -> Self {
        Self::TransactionFailure(cause.to_string())
    }

    /// Whether this error means "does not exist or not yours"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::PlaylistNotFound(_) | Self::SongNotFound(_)
        )
    }

    /// Whether the caller may retry the whole operation unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransactionFailure(_))
    }
}

// SQLite primary result codes for lock contention.
#[cfg(feature = "sqlx-support")]
const SQLITE_BUSY: i32 = 5;
#[cfg(feature = "sqlx-support")]
const SQLITE_LOCKED: i32 = 6;

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for HarmonyError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                if db_err.is_foreign_key_violation() {
                    return Self::Referential(db_err.message().to_string());
                }
                if db_err.is_unique_violation() {
                    return Self::Duplicate(db_err.message().to_string());
                }
                let primary_code = db_err
                    .code()
                    .and_then(|code| code.parse::<i32>().ok())
                    .map(|code| code & 0xff);
                if matches!(primary_code, Some(SQLITE_BUSY | SQLITE_LOCKED)) {
                    return Self::TransactionFailure(db_err.message().to_string());
                }
                Self::Database(err.to_string())
            }
            sqlx::Error::PoolTimedOut => Self::TransactionFailure(err.to_string()),
            _ => Self::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_formats_entity_and_id() {
        let err = HarmonyError::not_found("Song", 42);
        assert_eq!(err.to_string(), "Song not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn playlist_not_found_is_not_found() {
        assert!(HarmonyError::PlaylistNotFound(PlaylistId::new(3)).is_not_found());
        assert!(!HarmonyError::invalid_input("x").is_not_found());
    }

    #[test]
    fn only_transaction_failures_are_retryable() {
        assert!(HarmonyError::transaction("database is locked").is_retryable());
        assert!(!HarmonyError::Referential("song".into()).is_retryable());
        assert!(!HarmonyError::Duplicate("file".into()).is_retryable());
    }
}
