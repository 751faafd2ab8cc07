//! Content safety pipeline: scan, then sanitize.

use crate::services::scanner::ContentScanner;
use coverdesk_core::AppError;
use coverdesk_processing::{ImageSanitizer, SanitizedImage};
use std::sync::Arc;

/// Runs every upload through the virus scanner and then the image sanitizer.
///
/// The sanitizer only ever sees bytes the scanner reported clean, and its
/// output is the only thing callers may persist.
#[derive(Clone)]
pub struct ContentSafetyPipeline {
    scanner: Arc<dyn ContentScanner>,
    sanitizer: ImageSanitizer,
}

impl ContentSafetyPipeline {
    pub fn new(scanner: Arc<dyn ContentScanner>, sanitizer: ImageSanitizer) -> Self {
        Self { scanner, sanitizer }
    }

    #[tracing::instrument(skip(self, data), fields(size_bytes = data.len()))]
    pub async fn process(&self, data: Vec<u8>) -> Result<SanitizedImage, AppError> {
        self.scanner.scan(&data).await.into_result()?;
        self.sanitizer.sanitize(data).await
    }
}
