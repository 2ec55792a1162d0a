//! Harmony Storage
//!
//! `SQLite` database layer for Harmony.
//!
//! This crate provides persistent storage for users, the song catalog,
//! playlists with ordered membership, and favorites.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries and logic
//! - **User-Scoped Context**: `LocalStorageContext` binds every call to one acting user
//! - **Dense Ordering**: Playlist positions always form `1..=N`, maintained
//!   inside one transaction per mutation
//!
//! # Example
//!
//! ```rust,no_run
//! use harmony_core::storage::StorageContext;
//! use harmony_core::types::UserId;
//! use harmony_storage::{connect, LocalStorageContext};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create database connection and bring the schema up to date
//! let pool = connect("sqlite://harmony.db").await?;
//!
//! // Create storage context for user 1
//! let storage = LocalStorageContext::new(pool, UserId::new(1));
//!
//! // Get the user's playlists
//! let playlists = storage.get_user_playlists().await?;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod transaction;

// Vertical slices
pub mod albums;
pub mod favorites;
pub mod playlists;
pub mod songs;
pub mod users;

pub use context::LocalStorageContext;
pub use error::StorageError;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://harmony.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = %database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal) // Readers never see a half-applied reorder
        .busy_timeout(std::time::Duration::from_secs(30)); // Wait up to 30s for locks

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::info!("SQLite pool ready");

    Ok(pool)
}

/// Create a pool and run pending migrations
///
/// # Errors
///
/// Returns an error if the connection or a migration fails
pub async fn connect(database_url: &str) -> Result<SqlitePool, StorageError> {
    let pool = create_pool(database_url)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;
    run_migrations(&pool).await?;
    Ok(pool)
}
