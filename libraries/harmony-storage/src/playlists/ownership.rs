//! Playlist ownership checks
//!
//! A playlist that does not exist and a playlist owned by someone else are
//! indistinguishable to the caller: both are `PlaylistNotFound`.

use super::{map_playlist, PLAYLIST_COLUMNS};
use harmony_core::{error::Result, types::*, HarmonyError};
use sqlx::{SqliteConnection, SqlitePool};

/// Load the playlist if `user_id` owns it
pub async fn assert_owns_playlist(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<Playlist> {
    let row = sqlx::query(&format!(
        "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ? AND owner_id = ?"
    ))
    .bind(playlist_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    row.as_ref()
        .map(map_playlist)
        .ok_or(HarmonyError::PlaylistNotFound(playlist_id))
}

/// Ownership check for the write path.
///
/// Must be the first statement of a mutating transaction: the owner-filtered
/// write both proves ownership and takes SQLite's write lock, so nothing the
/// transaction reads from `playlist_songs` afterwards can change under it.
pub(crate) async fn claim_playlist(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE playlists SET updated_at = datetime('now') WHERE id = ? AND owner_id = ?",
    )
    .bind(playlist_id)
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        tracing::debug!(playlist_id = %playlist_id, user_id = %user_id, "Playlist claim rejected");
        return Err(HarmonyError::PlaylistNotFound(playlist_id));
    }

    Ok(())
}
