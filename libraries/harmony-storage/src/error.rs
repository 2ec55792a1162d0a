/// Storage setup errors
use thiserror::Error;

/// Storage error types
///
/// Query-level failures are reported as [`harmony_core::HarmonyError`];
/// this type covers opening and migrating the database.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Database connection error
    #[error("Database connection error: {0}")]
    Connection(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for harmony_core::HarmonyError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(e) => e.into(),
            other => harmony_core::HarmonyError::storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harmony_core::HarmonyError;

    #[test]
    fn connection_errors_become_storage_errors() {
        let err: HarmonyError = StorageError::Connection("unable to open".into()).into();
        assert!(matches!(err, HarmonyError::Storage(_)));
    }

    #[test]
    fn pool_timeouts_stay_retryable() {
        let err: HarmonyError = StorageError::Database(sqlx::Error::PoolTimedOut).into();
        assert!(err.is_retryable());
    }
}
