//! Reordering playlist entries
//!
//! A reorder is all-or-nothing: positions are rewritten inside one
//! transaction, and any failure leaves the previous order in place.

use super::membership::{count_entries, fetch_entry, first_occurrence, not_in_playlist, shift_range};
use super::ordering::{self, MovePlan};
use super::ownership::claim_playlist;
use crate::transaction;
use harmony_core::{error::Result, types::*, HarmonyError};
use sqlx::{Row, SqliteConnection, SqlitePool};

/// Replace the order of a playlist by song id.
///
/// Index `i` of `song_ids` receives position `i + 1`. The list must name
/// every member exactly once; see [`ordering::plan_song_reorder`].
pub async fn reorder_songs(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_ids: &[SongId],
    user_id: UserId,
) -> Result<()> {
    let mut tx = transaction::begin(pool).await?;
    claim_playlist(&mut tx, playlist_id, user_id).await?;

    let current = load_members(&mut tx, playlist_id).await?;
    let order = ordering::plan_song_reorder(&current, song_ids)?;
    write_order(&mut tx, playlist_id, &order).await?;

    transaction::commit(tx).await?;
    tracing::debug!(playlist_id = %playlist_id, entries = order.len(), "Playlist reordered");

    Ok(())
}

/// Replace the order of a playlist by entry id
pub async fn reorder_entries(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    entry_ids: &[EntryId],
    user_id: UserId,
) -> Result<()> {
    let mut tx = transaction::begin(pool).await?;
    claim_playlist(&mut tx, playlist_id, user_id).await?;

    let current: Vec<EntryId> = load_members(&mut tx, playlist_id)
        .await?
        .into_iter()
        .map(|(entry_id, _)| entry_id)
        .collect();
    let order = ordering::plan_entry_reorder(&current, entry_ids)?;
    write_order(&mut tx, playlist_id, &order).await?;

    transaction::commit(tx).await?;
    tracing::debug!(playlist_id = %playlist_id, entries = order.len(), "Playlist entries reordered");

    Ok(())
}

/// Move the lowest-position occurrence of a song to `new_position`
pub async fn move_song(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    song_id: SongId,
    new_position: u32,
    user_id: UserId,
) -> Result<PlaylistEntry> {
    let mut tx = transaction::begin(pool).await?;
    claim_playlist(&mut tx, playlist_id, user_id).await?;

    let entry = first_occurrence(&mut tx, playlist_id, song_id)
        .await?
        .ok_or_else(|| not_in_playlist(playlist_id, song_id))?;
    let moved = move_within(&mut tx, entry, new_position).await?;

    transaction::commit(tx).await?;
    Ok(moved)
}

/// Move one entry to `new_position`
pub async fn move_entry(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    entry_id: EntryId,
    new_position: u32,
    user_id: UserId,
) -> Result<PlaylistEntry> {
    let mut tx = transaction::begin(pool).await?;
    claim_playlist(&mut tx, playlist_id, user_id).await?;

    let entry = fetch_entry(&mut tx, playlist_id, entry_id)
        .await?
        .ok_or_else(|| HarmonyError::not_found("Playlist entry", entry_id))?;
    let moved = move_within(&mut tx, entry, new_position).await?;

    transaction::commit(tx).await?;
    Ok(moved)
}

async fn move_within(
    conn: &mut SqliteConnection,
    entry: PlaylistEntry,
    new_position: u32,
) -> Result<PlaylistEntry> {
    let len = count_entries(conn, entry.playlist_id).await?;
    let Some(plan) = ordering::plan_move(len, entry.position, new_position)? else {
        return Ok(entry);
    };

    apply_move(conn, &entry, &plan).await?;
    tracing::debug!(
        playlist_id = %entry.playlist_id,
        entry_id = %entry.id,
        from = plan.from,
        to = plan.to,
        "Playlist entry moved"
    );

    fetch_entry(conn, entry.playlist_id, entry.id)
        .await?
        .ok_or_else(|| HarmonyError::storage("Playlist entry vanished during move"))
}

async fn apply_move(conn: &mut SqliteConnection, entry: &PlaylistEntry, plan: &MovePlan) -> Result<()> {
    // Park the moving entry outside 1..=N while its neighbours shift
    set_position(conn, entry.id, 0).await?;
    shift_range(
        conn,
        entry.playlist_id,
        plan.shift.first,
        plan.shift.last,
        plan.shift.delta,
    )
    .await?;
    set_position(conn, entry.id, i64::from(plan.to)).await
}

/// Members in position order as `(entry, song)` pairs
async fn load_members(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
) -> Result<Vec<(EntryId, SongId)>> {
    let rows = sqlx::query(
        "SELECT id, song_id FROM playlist_songs WHERE playlist_id = ? ORDER BY position, song_id",
    )
    .bind(playlist_id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .iter()
        .map(|row| (row.get("id"), row.get("song_id")))
        .collect())
}

async fn write_order(
    conn: &mut SqliteConnection,
    playlist_id: PlaylistId,
    order: &[EntryId],
) -> Result<()> {
    // Negated positions are distinct from every final position
    sqlx::query("UPDATE playlist_songs SET position = -position WHERE playlist_id = ?")
        .bind(playlist_id)
        .execute(&mut *conn)
        .await?;

    for (entry_id, position) in ordering::assign_positions(order) {
        set_position(conn, entry_id, i64::from(position)).await?;
    }

    Ok(())
}

async fn set_position(conn: &mut SqliteConnection, entry_id: EntryId, position: i64) -> Result<()> {
    sqlx::query("UPDATE playlist_songs SET position = ? WHERE id = ?")
        .bind(position)
        .bind(entry_id)
        .execute(&mut *conn)
        .await?;
    Ok(())
}
