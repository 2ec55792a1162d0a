//! Ordered views of playlist contents

use super::ownership::assert_owns_playlist;
use crate::songs::map_song;
use futures_util::stream::{BoxStream, StreamExt, TryStreamExt};
use harmony_core::{error::Result, types::*, HarmonyError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const ORDERED_SONGS_QUERY: &str = r#"
    SELECT
        ps.id AS entry_id, ps.position,
        s.id, s.title, s.artist, s.album, s.duration, s.file_path,
        s.created_at, s.updated_at
    FROM playlist_songs ps
    INNER JOIN songs s ON ps.song_id = s.id
    WHERE ps.playlist_id = ?
    ORDER BY ps.position, s.id
"#;

fn map_ordered_song(row: &SqliteRow) -> OrderedSong {
    OrderedSong {
        entry_id: row.get("entry_id"),
        position: row.get("position"),
        song: map_song(row),
    }
}

/// Songs of an owned playlist, sorted by position (ties by song id)
pub async fn get_ordered_songs(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<Vec<OrderedSong>> {
    assert_owns_playlist(pool, playlist_id, user_id).await?;
    load_ordered_songs(pool, playlist_id).await
}

/// Same rows as [`get_ordered_songs`], produced lazily.
///
/// The ownership check runs before the stream is returned. The stream is
/// finite; calling this again runs the query again from the start.
pub async fn stream_ordered_songs(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    user_id: UserId,
) -> Result<BoxStream<'_, Result<OrderedSong>>> {
    assert_owns_playlist(pool, playlist_id, user_id).await?;

    Ok(sqlx::query(ORDERED_SONGS_QUERY)
        .bind(playlist_id)
        .fetch(pool)
        .map_ok(|row| map_ordered_song(&row))
        .map_err(HarmonyError::from)
        .boxed())
}

pub(crate) async fn load_ordered_songs(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
) -> Result<Vec<OrderedSong>> {
    let rows = sqlx::query(ORDERED_SONGS_QUERY)
        .bind(playlist_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(map_ordered_song).collect())
}
