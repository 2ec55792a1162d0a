//! Song catalog queries

use crate::{playlists, transaction};
use harmony_core::{error::Result, types::*, HarmonyError};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

const SONG_COLUMNS: &str =
    "id, title, artist, album, duration, file_path, created_at, updated_at";

/// Maximum number of rows a search returns
pub const SEARCH_LIMIT: i64 = 50;

pub(crate) fn map_song(row: &SqliteRow) -> Song {
    Song {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        album: row.get("album"),
        duration: row.get("duration"),
        file_path: row.get("file_path"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Get one page of the catalog together with the total song count
pub async fn list(pool: &SqlitePool, limit: u32, offset: u32) -> Result<SongPage> {
    let rows = sqlx::query(&format!(
        "SELECT {SONG_COLUMNS} FROM songs ORDER BY id LIMIT ? OFFSET ?"
    ))
    .bind(i64::from(limit))
    .bind(i64::from(offset))
    .fetch_all(pool)
    .await?;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
        .fetch_one(pool)
        .await?;

    Ok(SongPage {
        songs: rows.iter().map(map_song).collect(),
        total,
        limit,
        offset,
    })
}

/// Get song by ID
pub async fn get_by_id(pool: &SqlitePool, id: SongId) -> Result<Option<Song>> {
    let row = sqlx::query(&format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(map_song))
}

/// Create a new song
///
/// A second song with the same `file_path` fails with `Duplicate`.
pub async fn create(pool: &SqlitePool, song: CreateSong) -> Result<Song> {
    song.validate()?;

    let result = sqlx::query(
        r#"
        INSERT INTO songs (title, artist, album, duration, file_path)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&song.title)
    .bind(&song.artist)
    .bind(&song.album)
    .bind(song.duration)
    .bind(&song.file_path)
    .execute(pool)
    .await
    .map_err(|e| match HarmonyError::from(e) {
        HarmonyError::Duplicate(_) => HarmonyError::Duplicate(format!(
            "a song with file path {} already exists",
            song.file_path
        )),
        other => other,
    })?;

    let id = SongId::new(result.last_insert_rowid());
    tracing::info!(song_id = %id, title = %song.title, "Song created");

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| HarmonyError::storage("Failed to retrieve created song"))
}

/// Apply a partial update to a song
pub async fn update(pool: &SqlitePool, id: SongId, update: UpdateSong) -> Result<Song> {
    update.validate()?;

    let mut tx = transaction::begin(pool).await?;

    // Write first so the transaction holds the write lock before it reads
    let claimed = sqlx::query("UPDATE songs SET updated_at = datetime('now') WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if claimed.rows_affected() == 0 {
        return Err(HarmonyError::SongNotFound(id));
    }

    let row = sqlx::query(&format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?"))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    let mut song = map_song(&row);
    update.apply_to(&mut song);

    sqlx::query("UPDATE songs SET title = ?, artist = ?, album = ?, duration = ? WHERE id = ?")
        .bind(&song.title)
        .bind(&song.artist)
        .bind(&song.album)
        .bind(song.duration)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let row = sqlx::query(&format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?"))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

    transaction::commit(tx).await?;
    tracing::info!(song_id = %id, "Song updated");

    Ok(map_song(&row))
}

/// Delete a song
///
/// Every playlist holding the song loses those entries and is compacted in
/// the same transaction; favorites cascade.
pub async fn delete(pool: &SqlitePool, id: SongId) -> Result<()> {
    let mut tx = transaction::begin(pool).await?;

    let detached = playlists::membership::detach_song(&mut *tx, id).await?;

    let result = sqlx::query("DELETE FROM songs WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    if result.rows_affected() == 0 {
        return Err(HarmonyError::SongNotFound(id));
    }

    transaction::commit(tx).await?;
    tracing::info!(song_id = %id, playlist_entries = detached, "Song deleted");

    Ok(())
}

/// Search songs by title, artist, or album (substring match)
pub async fn search(pool: &SqlitePool, query: &str) -> Result<Vec<Song>> {
    let query = query.trim();
    if query.is_empty() {
        return Err(HarmonyError::invalid_input("search query is required"));
    }

    let pattern = format!("%{query}%");
    let rows = sqlx::query(&format!(
        r#"
        SELECT {SONG_COLUMNS}
        FROM songs
        WHERE title LIKE ? OR artist LIKE ? OR album LIKE ?
        ORDER BY title, id
        LIMIT ?
        "#
    ))
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(SEARCH_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_song).collect())
}
