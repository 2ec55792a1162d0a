/// Song catalog API routes
use crate::{
    error::{Result, ServerError},
    extract::ApiJson,
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use harmony_core::{
    storage::StorageContext,
    types::{Album, CreateSong, Song, SongId, SongPage, UpdateSong},
    HarmonyError,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ListSongsQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    10
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/songs?limit=&offset=
pub async fn list_songs(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<ListSongsQuery>,
) -> Result<Json<SongPage>> {
    let page = app_state
        .storage(auth.user_id())
        .list_songs(query.limit, query.offset)
        .await?;
    Ok(Json(page))
}

/// GET /api/songs/:id
pub async fn get_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Song>> {
    let song = app_state
        .storage(auth.user_id())
        .get_song(id)
        .await?
        .ok_or(HarmonyError::SongNotFound(id))?;
    Ok(Json(song))
}

/// POST /api/songs
pub async fn create_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<CreateSong>,
) -> Result<(StatusCode, Json<Song>)> {
    let song = app_state.storage(auth.user_id()).create_song(req).await?;
    tracing::info!(song_id = %song.id, title = %song.title, "Song created");
    Ok((StatusCode::CREATED, Json(song)))
}

/// PATCH /api/songs/:id
pub async fn update_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<UpdateSong>,
) -> Result<Json<Song>> {
    if req.is_empty() {
        return Err(ServerError::BadRequest("No fields to update".to_string()));
    }
    let song = app_state.storage(auth.user_id()).update_song(id, req).await?;
    Ok(Json(song))
}

/// DELETE /api/songs/:id
///
/// Removes the song from every playlist and deletes its audio file if it
/// lives in the media directory.
pub async fn delete_song(
    Path(id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    let storage = app_state.storage(auth.user_id());
    let song = storage
        .get_song(id)
        .await?
        .ok_or(HarmonyError::SongNotFound(id))?;

    storage.delete_song(id).await?;

    if let Err(e) = app_state.file_storage.delete_file(&song.file_path).await {
        tracing::warn!(song_id = %id, error = %e, "Failed to delete audio file");
    }

    tracing::info!(song_id = %id, "Song deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/search?q=
pub async fn search_songs(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Song>>> {
    let songs = app_state
        .storage(auth.user_id())
        .search_songs(&query.q)
        .await?;
    tracing::debug!(query = %query.q, results = songs.len(), "Search performed");
    Ok(Json(songs))
}

/// GET /api/albums/featured
pub async fn featured_albums(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Album>>> {
    let albums = app_state.storage(auth.user_id()).featured_albums().await?;
    Ok(Json(albums))
}
