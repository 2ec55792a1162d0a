//! Adding and removing playlist entries
//!
//! Every mutation runs in one transaction that starts with
//! [`claim_playlist`], so positions stay `1..=N` for every committed state.

use super::ownership::claim_playlist;
use super::{map_entry, ENTRY_COLUMNS};
use crate::transaction;
use harmony_core::{error::Result, types::*, HarmonyError};
use sqlx::{Row, SqliteConnection, SqlitePool};

/// Append a song to the end of a playlist.
///
/// Duplicates are allowed; the same song may hold several positions.
/// An unknown song fails with `Referential`.
pub async fn add_song(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
    user_id: UserId,
) -> Result<PlaylistEntry> {
    let mut tx = transaction::begin(pool).await?;
    claim_playlist(&mut tx, playlist_id, user_id).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO playlist_songs (playlist_id, song_id, position)
        SELECT ?, ?, COALESCE(MAX(position), 0) + 1
        FROM playlist_songs
        WHERE playlist_id = ?
        "#,
    )
    .bind(playlist_id)
    .bind(song_id)
    .bind(playlist_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| match HarmonyError::from(e) {
        HarmonyError::Referential(_) => {
            HarmonyError::Referential(format!("song {song_id} does not exist"))
        }
        other => other,
    })?;

    let entry_id = EntryId::new(result.last_insert_rowid());
    let entry = fetch_entry(&mut tx, playlist_id, entry_id)
        .await?
        .ok_or_else(|| HarmonyError::storage("Failed to retrieve created playlist entry"))?;

    transaction::commit(tx).await?;
    tracing::debug!(
        playlist_id = %playlist_id,
        song_id = %song_id,
        position = entry.position,
        "Song added to playlist"
    );

    Ok(entry)
}

/// Remove the lowest-position occurrence of a song and close the gap
pub async fn remove_song(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
    user_id: UserId,
) -> Result<PlaylistEntry> {
    let mut tx = transaction::begin(pool).await?;
    claim_playlist(&mut tx, playlist_id, user_id).await?;

    let entry = first_occurrence(&mut tx, playlist_id, song_id)
        .await?
        .ok_or_else(|| not_in_playlist(playlist_id, song_id))?;
    delete_and_compact(&mut tx, &entry).await?;

    transaction::commit(tx).await?;
    tracing::debug!(playlist_id = %playlist_id, song_id = %song_id, "Song removed from playlist");

    Ok(entry)
}

/// Remove one specific entry and close the gap
pub async fn remove_entry(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    entry_id: EntryId,
    user_id: UserId,
) -> Result<PlaylistEntry> {
    let mut tx = transaction::begin(pool).await?;
    claim_playlist(&mut tx, playlist_id, user_id).await?;

    let entry = fetch_entry(&mut tx, playlist_id, entry_id)
        .await?
        .ok_or_else(|| HarmonyError::not_found("Playlist entry", entry_id))?;
    delete_and_compact(&mut tx, &entry).await?;

    transaction::commit(tx).await?;
    tracing::debug!(playlist_id = %playlist_id, entry_id = %entry_id, "Playlist entry removed");

    Ok(entry)
}

/// Remove a song from every playlist, compacting each one.
///
/// Runs inside the caller's transaction (song deletion). Returns the number
/// of entries removed.
pub(crate) async fn detach_song(conn: &mut SqliteConnection, song_id: SongId) -> Result<u64> {
    // Highest positions first, so earlier removals never move later targets
    let rows = sqlx::query(&format!(
        "SELECT {ENTRY_COLUMNS} FROM playlist_songs WHERE song_id = ? ORDER BY playlist_id, position DESC"
    ))
    .bind(song_id)
    .fetch_all(&mut *conn)
    .await?;

    let mut touched: Vec<PlaylistId> = Vec::new();
    for row in &rows {
        let entry = map_entry(row);
        delete_and_compact(conn, &entry).await?;
        if touched.last() != Some(&entry.playlist_id) {
            touched.push(entry.playlist_id);
        }
    }

    for playlist_id in &touched {
        sqlx::query("UPDATE playlists SET updated_at = datetime('now') WHERE id = ?")
            .bind(*playlist_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(rows.len() as u64)
}

pub(crate) async fn fetch_entry(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
    entry_id: EntryId,
) -> Result<Option<PlaylistEntry>> {
    let row = sqlx::query(&format!(
        "SELECT {ENTRY_COLUMNS} FROM playlist_songs WHERE id = ? AND playlist_id = ?"
    ))
    .bind(entry_id)
    .bind(playlist_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.as_ref().map(map_entry))
}

pub(crate) async fn first_occurrence(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
    song_id: SongId,
) -> Result<Option<PlaylistEntry>> {
    let row = sqlx::query(&format!(
        r#"
        SELECT {ENTRY_COLUMNS} FROM playlist_songs
        WHERE playlist_id = ? AND song_id = ?
        ORDER BY position
        LIMIT 1
        "#
    ))
    .bind(playlist_id)
    .bind(song_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(row.as_ref().map(map_entry))
}

pub(crate) async fn count_entries(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
) -> Result<u32> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM playlist_songs WHERE playlist_id = ?")
        .bind(playlist_id)
        .fetch_one(&mut *conn)
        .await?;

    Ok(row.get::<u32, _>("n"))
}

pub(crate) fn not_in_playlist(playlist_id: PlaylistId, song_id: SongId) -> HarmonyError {
    HarmonyError::not_found(
        "Playlist entry",
        format!("song {song_id} in playlist {playlist_id}"),
    )
}

async fn delete_and_compact(conn: &mut SqliteConnection, entry: &PlaylistEntry) -> Result<()> {
    sqlx::query("DELETE FROM playlist_songs WHERE id = ?")
        .bind(entry.id)
        .execute(&mut *conn)
        .await?;

    shift_range(conn, entry.playlist_id, entry.position + 1, u32::MAX, -1).await
}

/// Move every entry with a position in `first..=last` by `delta` slots.
///
/// The unique `(playlist_id, position)` index is checked row by row, so the
/// run is first parked at negative positions and then flipped back.
pub(crate) async fn shift_range(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
    first: u32,
    last: u32,
    delta: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE playlist_songs SET position = -(position + ?)
        WHERE playlist_id = ? AND position BETWEEN ? AND ?
        "#,
    )
    .bind(delta)
    .bind(playlist_id)
    .bind(first)
    .bind(last)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        "UPDATE playlist_songs SET position = -position WHERE playlist_id = ? AND position < 0",
    )
    .bind(playlist_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
