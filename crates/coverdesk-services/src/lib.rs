//! Coverdesk Services Layer
//!
//! Orchestration between the HTTP layer and the storage and processing
//! crates: virus scanning, the content safety pipeline and blob publishing.
//! Keep thin HTTP handling in coverdesk-api.

pub mod services;

pub use coverdesk_processing::{CanonicalFormat, ImageSanitizer, SanitizedImage};
pub use coverdesk_storage::{
    create_storage, LocalStorage, S3Storage, Storage, StorageBackend, StorageError, StorageResult,
};
pub use services::clamav::ClamAVService;
pub use services::publisher::BlobPublisher;
pub use services::safety::ContentSafetyPipeline;
pub use services::scanner::{ContentScanner, ScanResult};
