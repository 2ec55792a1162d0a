/// File storage service tests
/// Tests upload naming, path resolution, and traversal protection
use harmony_server::{services::FileStorage, ServerError};
use tempfile::TempDir;

async fn storage() -> (FileStorage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let storage = FileStorage::new(temp_dir.path().join("media"));
    storage.initialize().await.unwrap();
    (storage, temp_dir)
}

/// Test initialization creates the media directory
#[tokio::test]
async fn test_file_storage_initialization() {
    let (storage, _temp_dir) = storage().await;
    assert!(storage.base_path().is_dir(), "Media directory should be created");
}

/// Test stored uploads keep their bytes under the sanitized name
#[tokio::test]
async fn test_store_upload() {
    let (storage, _temp_dir) = storage().await;

    let name = storage
        .store_upload("Song For  My Father.mp3", b"audio")
        .await
        .unwrap();

    assert_eq!(name, "song-for-my-father.mp3");
    assert_eq!(
        std::fs::read(storage.base_path().join(&name)).unwrap(),
        b"audio"
    );
}

/// Test path components in client file names are ignored
#[tokio::test]
async fn test_upload_name_cannot_escape() {
    let (storage, temp_dir) = storage().await;

    let name = storage
        .store_upload("../outside.mp3", b"audio")
        .await
        .unwrap();

    assert_eq!(name, "outside.mp3");
    assert!(!temp_dir.path().join("outside.mp3").exists());
    assert!(storage.base_path().join("outside.mp3").exists());
}

/// Test resolving a missing file is not found
#[tokio::test]
async fn test_resolve_missing_file() {
    let (storage, _temp_dir) = storage().await;

    let result = storage.resolve("nothing-here.mp3");
    assert!(matches!(result, Err(ServerError::NotFound(_))));
}

/// Test relative traversal out of the media directory is refused
#[tokio::test]
async fn test_resolve_rejects_traversal() {
    let (storage, temp_dir) = storage().await;
    std::fs::write(temp_dir.path().join("secret.txt"), b"secret").unwrap();

    let result = storage.resolve("../secret.txt");
    assert!(matches!(result, Err(ServerError::Unauthorized(_))));
}

/// Test deleting is idempotent
#[tokio::test]
async fn test_delete_file() {
    let (storage, _temp_dir) = storage().await;
    let name = storage.store_upload("gone.mp3", b"x").await.unwrap();

    storage.delete_file(&name).await.unwrap();
    assert!(!storage.base_path().join(&name).exists());

    storage.delete_file(&name).await.unwrap();
}
