/// Favorites API routes
use crate::{error::Result, middleware::AuthenticatedUser, state::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use harmony_core::{
    storage::StorageContext,
    types::{Song, SongId},
};

/// GET /api/favorites
pub async fn list_favorites(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Song>>> {
    let songs = app_state.storage(auth.user_id()).get_favorites().await?;
    Ok(Json(songs))
}

/// PUT /api/favorites/:song_id
/// Idempotent; favoriting twice is not an error
pub async fn add_favorite(
    Path(song_id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state
        .storage(auth.user_id())
        .add_favorite(song_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/favorites/:song_id
pub async fn remove_favorite(
    Path(song_id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state
        .storage(auth.user_id())
        .remove_favorite(song_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
