use crate::StorageBackend;
use async_trait::async_trait;

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Key-addressed blob store.
///
/// Callers choose the key; backends never return URLs. Overwriting an
/// existing key is allowed but keys produced by
/// [`submission_cover_key`](crate::keys::submission_cover_key) do not collide
/// in practice.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `storage_key` with the given content type.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<()>;

    /// Delete the object at `storage_key`. Deleting a missing object succeeds.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    async fn exists(&self, storage_key: &str) -> StorageResult<bool>;

    fn backend_type(&self) -> StorageBackend;
}
