/// Playlists API routes
use crate::{
    error::{Result, ServerError},
    extract::ApiJson,
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use futures_util::{stream, TryStreamExt};
use harmony_core::{
    storage::StorageContext,
    types::{
        EntryId, OrderedSong, Playlist, PlaylistEntry, PlaylistId, PlaylistMixes, SongId,
        UpdatePlaylist,
    },
};
use serde::Deserialize;
use tokio::sync::mpsc;

#[derive(Debug, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddSongRequest {
    pub song_id: SongId,
}

#[derive(Debug, Deserialize)]
pub struct MoveRequest {
    pub position: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SongOrder {
    pub song_ids: Vec<SongId>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryOrder {
    pub entry_ids: Vec<EntryId>,
}

/// New order, either by song or by membership row; a body naming both is rejected
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ReorderRequest {
    Songs(SongOrder),
    Entries(EntryOrder),
}

/// GET /api/playlists
/// Playlists of the authenticated user, most recently updated first
pub async fn list_playlists(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<Playlist>>> {
    let playlists = app_state
        .storage(auth.user_id())
        .get_user_playlists()
        .await?;
    Ok(Json(playlists))
}

/// POST /api/playlists
pub async fn create_playlist(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<CreatePlaylistRequest>,
) -> Result<(StatusCode, Json<Playlist>)> {
    let playlist = app_state
        .storage(auth.user_id())
        .create_playlist(&req.name)
        .await?;
    tracing::info!(playlist_id = %playlist.id, user_id = %auth.user_id(), "Playlist created");
    Ok((StatusCode::CREATED, Json(playlist)))
}

/// GET /api/playlists/mixes
pub async fn get_mixes(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistMixes>> {
    let mixes = app_state.storage(auth.user_id()).get_mixes().await?;
    Ok(Json(mixes))
}

/// GET /api/playlists/:id
/// Playlist with its songs in order
pub async fn get_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Playlist>> {
    let playlist = app_state
        .storage(auth.user_id())
        .get_playlist_with_songs(id)
        .await?;
    Ok(Json(playlist))
}

/// PATCH /api/playlists/:id
pub async fn update_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<UpdatePlaylist>,
) -> Result<Json<Playlist>> {
    let playlist = app_state
        .storage(auth.user_id())
        .update_playlist(id, req)
        .await?;
    Ok(Json(playlist))
}

/// DELETE /api/playlists/:id
pub async fn delete_playlist(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<StatusCode> {
    app_state.storage(auth.user_id()).delete_playlist(id).await?;
    tracing::info!(playlist_id = %id, "Playlist deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/playlists/:id/songs
pub async fn list_songs(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<Vec<OrderedSong>>> {
    let songs = app_state
        .storage(auth.user_id())
        .get_ordered_songs(id)
        .await?;
    Ok(Json(songs))
}

/// GET /api/playlists/:id/songs/stream
/// Songs in order as newline-delimited JSON, one row at a time
pub async fn stream_songs(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Response> {
    let storage = app_state.storage(auth.user_id());
    storage.assert_owns_playlist(id).await?;

    let (tx, rx) = mpsc::channel::<std::io::Result<String>>(16);

    tokio::spawn(async move {
        let result = async {
            let mut songs = storage.stream_ordered_songs(id).await?;
            while let Some(song) = songs.try_next().await? {
                let mut line = serde_json::to_string(&song)?;
                line.push('\n');
                if tx.send(Ok(line)).await.is_err() {
                    break; // client went away
                }
            }
            Ok::<_, harmony_core::HarmonyError>(())
        }
        .await;

        if let Err(e) = result {
            tracing::error!(playlist_id = %id, error = %e, "Playlist stream failed");
            let _ = tx.send(Err(std::io::Error::other(e.to_string()))).await;
        }
    });

    let lines = stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|line| (line, rx))
    });

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/x-ndjson")
        .body(Body::from_stream(lines))
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))
}

/// POST /api/playlists/:id/songs
/// Append a song to the end of the playlist
pub async fn add_song(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<AddSongRequest>,
) -> Result<(StatusCode, Json<PlaylistEntry>)> {
    let entry = app_state
        .storage(auth.user_id())
        .add_song_to_playlist(id, req.song_id)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// DELETE /api/playlists/:id/songs/:song_id
/// Remove the first occurrence of a song
pub async fn remove_song(
    Path((id, song_id)): Path<(PlaylistId, SongId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistEntry>> {
    let removed = app_state
        .storage(auth.user_id())
        .remove_song_from_playlist(id, song_id)
        .await?;
    Ok(Json(removed))
}

/// PATCH /api/playlists/:id/songs/:song_id
/// Move the first occurrence of a song to a new position
pub async fn move_song(
    Path((id, song_id)): Path<(PlaylistId, SongId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<MoveRequest>,
) -> Result<Json<PlaylistEntry>> {
    let moved = app_state
        .storage(auth.user_id())
        .move_song(id, song_id, req.position)
        .await?;
    Ok(Json(moved))
}

/// DELETE /api/playlists/:id/entries/:entry_id
pub async fn remove_entry(
    Path((id, entry_id)): Path<(PlaylistId, EntryId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<PlaylistEntry>> {
    let removed = app_state
        .storage(auth.user_id())
        .remove_playlist_entry(id, entry_id)
        .await?;
    Ok(Json(removed))
}

/// PATCH /api/playlists/:id/entries/:entry_id
pub async fn move_entry(
    Path((id, entry_id)): Path<(PlaylistId, EntryId)>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<MoveRequest>,
) -> Result<Json<PlaylistEntry>> {
    let moved = app_state
        .storage(auth.user_id())
        .move_entry(id, entry_id, req.position)
        .await?;
    Ok(Json(moved))
}

/// PUT /api/playlists/:id/order
/// Replace the whole order; responds with the reordered songs
pub async fn reorder(
    Path(id): Path<PlaylistId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<ReorderRequest>,
) -> Result<Json<Vec<OrderedSong>>> {
    let storage = app_state.storage(auth.user_id());
    match req {
        ReorderRequest::Songs(order) => storage.reorder_playlist(id, order.song_ids).await?,
        ReorderRequest::Entries(order) => {
            storage.reorder_playlist_entries(id, order.entry_ids).await?;
        }
    }
    Ok(Json(storage.get_ordered_songs(id).await?))
}
