/// Shared application state
use crate::services::{AuthService, FileStorage};
use harmony_core::{types::UserId, PlayerState};
use harmony_storage::LocalStorageContext;
use sqlx::SqlitePool;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// One player per signed-in user
pub type Players = Arc<RwLock<HashMap<UserId, PlayerState>>>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub auth_service: Arc<AuthService>,
    pub file_storage: Arc<FileStorage>,
    pub players: Players,
}

impl AppState {
    pub fn new(
        pool: SqlitePool,
        auth_service: Arc<AuthService>,
        file_storage: Arc<FileStorage>,
    ) -> Self {
        Self {
            pool,
            auth_service,
            file_storage,
            players: Players::default(),
        }
    }

    /// Storage bound to the acting user
    pub fn storage(&self, user_id: UserId) -> LocalStorageContext {
        LocalStorageContext::new(self.pool.clone(), user_id)
    }
}
