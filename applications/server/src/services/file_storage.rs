/// File storage service - manages uploaded audio files on disk
use crate::error::{Result, ServerError};
use harmony_core::HarmonyError;
use std::path::{Path, PathBuf};
use tokio::{
    fs,
    io::{AsyncWrite, AsyncWriteExt},
};

#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Initialize the media directory
    pub async fn initialize(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path).await?;
        Ok(())
    }

    /// Turn a client-supplied file name into the name stored on disk
    ///
    /// Directory components are dropped, whitespace runs become `-` and the
    /// result is lowercased: `"My Song.MP3"` becomes `"my-song.mp3"`.
    pub fn sanitize_filename(name: &str) -> Result<String> {
        let base = name.rsplit(|c| c == '/' || c == '\\').next().unwrap_or_default();

        let sanitized = base
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("-")
            .to_lowercase();

        if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
            return Err(ServerError::BadRequest(format!(
                "Invalid file name: {name:?}"
            )));
        }

        Ok(sanitized)
    }

    /// Write an uploaded file under its sanitized name
    ///
    /// Returns the stored file name. An existing file with the same name is
    /// never overwritten.
    pub async fn store_upload(&self, filename: &str, data: &[u8]) -> Result<String> {
        let stored_name = Self::sanitize_filename(filename)?;
        let path = self.base_path.join(&stored_name);

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => ServerError::Core(HarmonyError::Duplicate(
                    format!("A file named {stored_name} already exists"),
                )),
                _ => ServerError::Io(e),
            })?;

        write_or_discard(&mut file, &path, data).await?;

        tracing::debug!(path = %path.display(), bytes = data.len(), "Stored upload");
        Ok(stored_name)
    }

    /// Resolve a song's `file_path` to a file inside the media directory
    ///
    /// Relative paths are taken relative to the media directory.
    pub fn resolve(&self, file_path: &str) -> Result<PathBuf> {
        let path = Path::new(file_path);
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_path.join(path)
        };

        if !path.exists() {
            return Err(ServerError::NotFound(format!(
                "Audio file not found: {file_path}"
            )));
        }

        self.validate_path(&path)?;
        Ok(path)
    }

    /// Remove a stored file if it is present
    pub async fn delete_file(&self, file_path: &str) -> Result<()> {
        match self.resolve(file_path) {
            Ok(path) => {
                fs::remove_file(&path).await?;
                Ok(())
            }
            Err(ServerError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Validate that a path is within the storage directory (prevent directory traversal)
    pub fn validate_path(&self, path: &Path) -> Result<()> {
        let canonical_base = self
            .base_path
            .canonicalize()
            .map_err(|e| ServerError::Storage(format!("Invalid base path: {}", e)))?;

        let canonical_path = path
            .canonicalize()
            .map_err(|e| ServerError::Storage(format!("Invalid path: {}", e)))?;

        if !canonical_path.starts_with(&canonical_base) {
            return Err(ServerError::Unauthorized(
                "Path traversal attempt detected".to_string(),
            ));
        }

        Ok(())
    }
}

/// Write `data` to a freshly created file, removing the file if the write fails
async fn write_or_discard<W>(writer: &mut W, path: &Path, data: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(data).await?;
        writer.flush().await
    }
    .await;

    if let Err(e) = written {
        if let Err(cleanup) = fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %cleanup, "Failed to remove partial upload");
        }
        return Err(e.into());
    }
    Ok(())
}
