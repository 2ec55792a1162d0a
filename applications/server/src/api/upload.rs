/// Audio upload API
use crate::{
    error::{Result, ServerError},
    middleware::AuthenticatedUser,
    state::AppState,
};
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, StatusCode},
    Json,
};
use harmony_core::{
    storage::StorageContext,
    types::{CreateSong, Song},
};
use serde::{Deserialize, Serialize};

/// Optional `metadata` form field
#[derive(Debug, Default, Deserialize)]
pub struct UploadMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub duration: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub song: Song,
}

/// POST /api/upload
/// Store an audio file and register it as a song
pub async fn upload_song(
    State(app_state): State<AppState>,
    auth: AuthenticatedUser,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<UploadResponse>)> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::BadRequest("Missing Content-Type".to_string()))?;

    if !content_type.starts_with("multipart/form-data") {
        return Err(ServerError::BadRequest(
            "Expected multipart/form-data".to_string(),
        ));
    }

    let boundary = multer::parse_boundary(content_type)
        .map_err(|_| ServerError::BadRequest("Missing boundary".to_string()))?;

    let stream = futures_util::stream::once(async move { Ok::<_, std::io::Error>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut upload: Option<(String, Bytes)> = None;
    let mut metadata_json: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Failed to parse multipart: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or("upload").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read file: {}", e)))?;
                upload = Some((filename, data));
            }
            Some("metadata") => {
                metadata_json = Some(field.text().await.map_err(|e| {
                    ServerError::BadRequest(format!("Failed to read metadata: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let (filename, data) =
        upload.ok_or_else(|| ServerError::BadRequest("No file uploaded".to_string()))?;

    let metadata: UploadMetadata = match metadata_json.as_deref() {
        Some(json) if !json.trim().is_empty() => serde_json::from_str(json)
            .map_err(|e| ServerError::BadRequest(format!("Invalid metadata: {}", e)))?,
        _ => UploadMetadata::default(),
    };

    let stored_name = app_state.file_storage.store_upload(&filename, &data).await?;

    let new_song = CreateSong {
        title: metadata.title.unwrap_or_else(|| stored_name.clone()),
        artist: metadata
            .artist
            .unwrap_or_else(|| "Unknown Artist".to_string()),
        album: Some(
            metadata
                .album
                .unwrap_or_else(|| "Unknown Album".to_string()),
        ),
        duration: metadata.duration.unwrap_or(0),
        file_path: stored_name.clone(),
    };

    let song = match app_state.storage(auth.user_id()).create_song(new_song).await {
        Ok(song) => song,
        Err(e) => {
            // Keep disk and catalog in step
            if let Err(cleanup) = app_state.file_storage.delete_file(&stored_name).await {
                tracing::warn!(file = %stored_name, error = %cleanup, "Failed to remove orphaned upload");
            }
            return Err(e.into());
        }
    };

    tracing::info!(song_id = %song.id, file = %stored_name, bytes = data.len(), "File uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            filename: stored_name,
            song,
        }),
    ))
}
