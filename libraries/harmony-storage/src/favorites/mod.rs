//! Per-user favorite songs

use crate::songs::map_song;
use harmony_core::{error::Result, types::*, HarmonyError};
use sqlx::SqlitePool;

/// Favorite songs of a user, most recently added first
pub async fn get_for_user(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Song>> {
    let rows = sqlx::query(
        r#"
        SELECT s.id, s.title, s.artist, s.album, s.duration, s.file_path,
               s.created_at, s.updated_at
        FROM user_favorites f
        INNER JOIN songs s ON f.song_id = s.id
        WHERE f.user_id = ?
        ORDER BY f.created_at DESC, f.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_song).collect())
}

/// Mark a song as favorite. Adding an existing favorite is a no-op.
pub async fn add(pool: &SqlitePool, user_id: UserId, song_id: SongId) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO user_favorites (user_id, song_id)
        VALUES (?, ?)
        ON CONFLICT(user_id, song_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(song_id)
    .execute(pool)
    .await
    .map_err(|e| match HarmonyError::from(e) {
        HarmonyError::Referential(_) => {
            HarmonyError::Referential(format!("song {song_id} does not exist"))
        }
        other => other,
    })?;

    Ok(())
}

/// Unmark a favorite song
pub async fn remove(pool: &SqlitePool, user_id: UserId, song_id: SongId) -> Result<()> {
    let result = sqlx::query("DELETE FROM user_favorites WHERE user_id = ? AND song_id = ?")
        .bind(user_id)
        .bind(song_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(HarmonyError::not_found("Favorite", song_id));
    }

    Ok(())
}

/// Whether the user has marked the song as favorite
pub async fn is_favorite(pool: &SqlitePool, user_id: UserId, song_id: SongId) -> Result<bool> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM user_favorites WHERE user_id = ? AND song_id = ?",
    )
    .bind(user_id)
    .bind(song_id)
    .fetch_one(pool)
    .await?;

    Ok(count > 0)
}
