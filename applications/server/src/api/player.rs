/// "Now playing" API routes
use crate::{error::Result, extract::ApiJson, middleware::AuthenticatedUser, state::AppState};
use axum::{extract::State, http::StatusCode, Json};
use harmony_core::{storage::StorageContext, types::SongId, HarmonyError, NowPlaying};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct PlayerResponse {
    pub currently_playing: Option<NowPlaying>,
}

#[derive(Debug, Deserialize)]
pub struct PlayRequest {
    pub song_id: SongId,
    #[serde(default)]
    pub cover_image: Option<String>,
}

/// GET /api/player
pub async fn get_player(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
) -> Json<PlayerResponse> {
    let players = app_state.players.read().await;
    let currently_playing = players
        .get(&auth.user_id())
        .and_then(|player| player.currently_playing().cloned());
    Json(PlayerResponse { currently_playing })
}

/// PUT /api/player
/// Title and artist are taken from the catalog, not from the client
pub async fn play(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    ApiJson(req): ApiJson<PlayRequest>,
) -> Result<Json<PlayerResponse>> {
    let song = app_state
        .storage(auth.user_id())
        .get_song(req.song_id)
        .await?
        .ok_or(HarmonyError::SongNotFound(req.song_id))?;

    let now_playing = NowPlaying {
        song_id: song.id,
        title: song.title,
        artist: song.artist,
        cover_image: req.cover_image,
    };

    app_state
        .players
        .write()
        .await
        .entry(auth.user_id())
        .or_default()
        .set_currently_playing(now_playing.clone());

    Ok(Json(PlayerResponse {
        currently_playing: Some(now_playing),
    }))
}

/// DELETE /api/player
pub async fn stop(State(app_state): State<AppState>, auth: AuthenticatedUser) -> StatusCode {
    app_state.players.write().await.remove(&auth.user_id());
    StatusCode::NO_CONTENT
}
