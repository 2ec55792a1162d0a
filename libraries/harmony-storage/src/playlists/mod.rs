//! Playlists and their ordered membership
//!
//! - [`ownership`]: owner checks, read and write path
//! - [`membership`]: add and remove entries, keeping positions dense
//! - [`reorder`]: full reorders and single moves
//! - [`ordering`]: pure planning used by the reorder engine
//! - [`projection`]: ordered song lists

pub mod membership;
pub mod ordering;
pub mod ownership;
pub mod projection;
pub mod reorder;

pub use membership::{add_song, remove_entry, remove_song};
pub use ownership::assert_owns_playlist;
pub use projection::{get_ordered_songs, stream_ordered_songs};
pub use reorder::{move_entry, move_song, reorder_entries, reorder_songs};

use crate::transaction;
use harmony_core::{error::Result, types::*, HarmonyError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

pub(crate) const PLAYLIST_COLUMNS: &str = "id, owner_id, name, created_at, updated_at";
pub(crate) const ENTRY_COLUMNS: &str = "id, playlist_id, song_id, position, created_at";

/// Most "Daily Mix" playlists shown on the home screen
pub const DAILY_MIX_LIMIT: i64 = 6;
/// Most other playlists shown on the home screen
pub const MIX_PLAYLIST_LIMIT: i64 = 10;

pub(crate) fn map_playlist(row: &SqliteRow) -> Playlist {
    Playlist {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        name: row.get("name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        songs: None,
    }
}

pub(crate) fn map_entry(row: &SqliteRow) -> PlaylistEntry {
    PlaylistEntry {
        id: row.get("id"),
        playlist_id: row.get("playlist_id"),
        song_id: row.get("song_id"),
        position: row.get("position"),
        created_at: row.get("created_at"),
    }
}

/// Get the user's playlists, most recently updated first
pub async fn get_user_playlists(pool: &SqlitePool, user_id: UserId) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(&format!(
        r#"
        SELECT {PLAYLIST_COLUMNS}
        FROM playlists
        WHERE owner_id = ?
        ORDER BY updated_at DESC, id DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_playlist).collect())
}

/// Get an owned playlist with its songs in order
pub async fn get_with_songs(
    pool: &SqlitePool,
    id: PlaylistId,
    user_id: UserId,
) -> Result<Playlist> {
    let mut playlist = assert_owns_playlist(pool, id, user_id).await?;
    playlist.songs = Some(projection::load_ordered_songs(pool, id).await?);
    Ok(playlist)
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, playlist: CreatePlaylist) -> Result<Playlist> {
    playlist.validate()?;

    let result = sqlx::query("INSERT INTO playlists (owner_id, name) VALUES (?, ?)")
        .bind(playlist.owner_id)
        .bind(playlist.name.trim())
        .execute(pool)
        .await
        .map_err(|e| match HarmonyError::from(e) {
            HarmonyError::Referential(_) => {
                HarmonyError::Referential(format!("user {} does not exist", playlist.owner_id))
            }
            other => other,
        })?;

    let id = PlaylistId::new(result.last_insert_rowid());
    tracing::info!(playlist_id = %id, owner_id = %playlist.owner_id, "Playlist created");

    assert_owns_playlist(pool, id, playlist.owner_id).await
}

/// Rename an owned playlist
pub async fn update(
    pool: &SqlitePool,
    id: PlaylistId,
    update: UpdatePlaylist,
    user_id: UserId,
) -> Result<Playlist> {
    update.validate()?;

    let mut tx = transaction::begin(pool).await?;
    ownership::claim_playlist(&mut tx, id, user_id).await?;

    let row = sqlx::query(&format!("SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?"))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    let mut playlist = map_playlist(&row);
    update.apply_to(&mut playlist);

    sqlx::query("UPDATE playlists SET name = ? WHERE id = ?")
        .bind(playlist.name.trim())
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query(&format!("SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = ?"))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    transaction::commit(tx).await?;
    Ok(map_playlist(&row))
}

/// Delete an owned playlist (its entries cascade)
pub async fn delete(pool: &SqlitePool, id: PlaylistId, user_id: UserId) -> Result<()> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ? AND owner_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(HarmonyError::PlaylistNotFound(id));
    }

    tracing::info!(playlist_id = %id, "Playlist deleted");
    Ok(())
}

/// The user's non-empty playlists in random order, split into
/// "Daily Mix" playlists and the rest
pub async fn get_mixes(pool: &SqlitePool, user_id: UserId) -> Result<PlaylistMixes> {
    let query = |daily: bool| {
        format!(
            r#"
            SELECT {PLAYLIST_COLUMNS}
            FROM playlists p
            WHERE p.owner_id = ?
              AND p.name {} LIKE 'Daily Mix%'
              AND EXISTS (SELECT 1 FROM playlist_songs ps WHERE ps.playlist_id = p.id)
            ORDER BY RANDOM()
            LIMIT ?
            "#,
            if daily { "" } else { "NOT" }
        )
    };

    let daily_mix = sqlx::query(&query(true))
        .bind(user_id)
        .bind(DAILY_MIX_LIMIT)
        .fetch_all(pool)
        .await?;

    let playlists = sqlx::query(&query(false))
        .bind(user_id)
        .bind(MIX_PLAYLIST_LIMIT)
        .fetch_all(pool)
        .await?;

    Ok(PlaylistMixes {
        daily_mix: daily_mix.iter().map(map_playlist).collect(),
        playlists: playlists.iter().map(map_playlist).collect(),
    })
}
