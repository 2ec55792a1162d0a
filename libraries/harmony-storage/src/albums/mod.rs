use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use harmony_core::{error::Result, types::*};

/// Most albums returned by [`get_featured`]
pub const FEATURED_LIMIT: i64 = 4;

fn map_album(row: &SqliteRow) -> Album {
    Album {
        title: row.get("title"),
        artist: row.get("artist"),
        song_count: row.get("song_count"),
    }
}

/// All albums, derived from the songs that name one
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = sqlx::query(
        "SELECT album AS title, artist, COUNT(*) AS song_count
         FROM songs
         WHERE album IS NOT NULL
         GROUP BY album, artist
         ORDER BY album, artist",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_album).collect())
}

/// Random sample of albums for the home screen
pub async fn get_featured(pool: &SqlitePool) -> Result<Vec<Album>> {
    let rows = sqlx::query(
        "SELECT album AS title, artist, COUNT(*) AS song_count
         FROM songs
         WHERE album IS NOT NULL
         GROUP BY album, artist
         ORDER BY RANDOM()
         LIMIT ?",
    )
    .bind(FEATURED_LIMIT)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_album).collect())
}
