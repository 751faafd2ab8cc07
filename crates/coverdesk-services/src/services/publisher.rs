//! Blob publisher: key derivation and bounded upload of sanitized covers.

use chrono::Utc;
use coverdesk_core::AppError;
use coverdesk_processing::SanitizedImage;
use coverdesk_storage::{submission_cover_key, Storage};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct BlobPublisher {
    storage: Arc<dyn Storage>,
    upload_timeout: Duration,
}

impl BlobPublisher {
    pub fn new(storage: Arc<dyn Storage>, upload_timeout: Duration) -> Self {
        Self {
            storage,
            upload_timeout,
        }
    }

    /// Upload `image` under a fresh key and return that key.
    ///
    /// Errors and timeouts are `StorageUnavailable`; nothing references the
    /// key unless this returns `Ok`.
    #[tracing::instrument(skip(self, image), fields(size_bytes = image.data.len()))]
    pub async fn publish(
        &self,
        volume_title: &str,
        image: SanitizedImage,
    ) -> Result<String, AppError> {
        let key = submission_cover_key(volume_title, image.format.extension(), Utc::now());
        let content_type = image.format.content_type();

        match tokio::time::timeout(
            self.upload_timeout,
            self.storage.upload_with_key(&key, image.data, content_type),
        )
        .await
        {
            Ok(Ok(())) => {
                tracing::debug!(storage_key = %key, "Cover uploaded");
                Ok(key)
            }
            Ok(Err(e)) => {
                tracing::error!(storage_key = %key, error = %e, "Cover upload failed");
                Err(AppError::StorageUnavailable(e.to_string()))
            }
            Err(_) => {
                tracing::error!(
                    storage_key = %key,
                    timeout_secs = self.upload_timeout.as_secs(),
                    "Cover upload timed out"
                );
                Err(AppError::StorageUnavailable(format!(
                    "Upload timed out after {} seconds",
                    self.upload_timeout.as_secs()
                )))
            }
        }
    }

    /// Remove an uploaded object that no row will reference. Best effort.
    pub async fn discard(&self, key: &str) {
        if let Err(e) = self.storage.delete(key).await {
            tracing::warn!(storage_key = %key, error = %e, "Failed to delete orphaned cover");
        } else {
            tracing::info!(storage_key = %key, "Deleted orphaned cover");
        }
    }
}
