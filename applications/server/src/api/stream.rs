/// Audio streaming API
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use harmony_core::{storage::StorageContext, types::SongId, HarmonyError};
use std::io::SeekFrom;
use tokio::{
    fs::File,
    io::{AsyncReadExt, AsyncSeekExt},
};
use tokio_util::io::ReaderStream;

/// GET /api/stream/:song_id
/// Stream a song's audio file with range request support
pub async fn stream_song(
    Path(song_id): Path<SongId>,
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
) -> Result<Response> {
    let song = app_state
        .storage(auth.user_id())
        .get_song(song_id)
        .await?
        .ok_or(HarmonyError::SongNotFound(song_id))?;

    let file_path = app_state.file_storage.resolve(&song.file_path)?;

    let file_size = tokio::fs::metadata(&file_path).await?.len();

    let mime_type = mime_guess::from_path(&file_path)
        .first_or_octet_stream()
        .to_string();

    if let Some(range) = headers.get(header::RANGE) {
        let range_str = range
            .to_str()
            .map_err(|_| ServerError::BadRequest("Invalid Range header".to_string()))?;

        let Some((start, end)) = parse_range(range_str, file_size) else {
            return Response::builder()
                .status(StatusCode::RANGE_NOT_SATISFIABLE)
                .header(header::CONTENT_RANGE, format!("bytes */{file_size}"))
                .body(Body::empty())
                .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)));
        };

        let mut file = File::open(&file_path).await?;
        file.seek(SeekFrom::Start(start)).await?;

        let content_length = end - start + 1;
        let reader = ReaderStream::new(file.take(content_length));
        let body = Body::from_stream(reader);

        let response = Response::builder()
            .status(StatusCode::PARTIAL_CONTENT)
            .header(header::CONTENT_TYPE, mime_type)
            .header(header::CONTENT_LENGTH, content_length)
            .header(
                header::CONTENT_RANGE,
                format!("bytes {}-{}/{}", start, end, file_size),
            )
            .header(header::ACCEPT_RANGES, "bytes")
            .body(body)
            .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))?;

        return Ok(response);
    }

    // No range request - stream entire file
    let file = File::open(&file_path).await?;
    let reader = ReaderStream::new(file);
    let body = Body::from_stream(reader);

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_LENGTH, file_size)
        .header(header::ACCEPT_RANGES, "bytes")
        .body(body)
        .map_err(|e| ServerError::Internal(format!("Failed to build response: {}", e)))?;

    Ok(response)
}

/// Parse HTTP Range header
/// Format: "bytes=start-end", "bytes=start-" or "bytes=-suffix"
fn parse_range(range: &str, file_size: u64) -> Option<(u64, u64)> {
    let range = range.strip_prefix("bytes=")?;
    let (start_str, end_str) = range.split_once('-')?;

    if file_size == 0 {
        return None;
    }

    if start_str.is_empty() {
        let suffix: u64 = end_str.parse().ok()?;
        if suffix == 0 {
            return None;
        }
        return Some((file_size.saturating_sub(suffix), file_size - 1));
    }

    let start: u64 = start_str.parse().ok()?;
    let end: u64 = if end_str.is_empty() {
        file_size - 1
    } else {
        end_str.parse::<u64>().ok()?.min(file_size - 1)
    };

    (start <= end).then_some((start, end))
}
