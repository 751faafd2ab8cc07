//! Blob storage for submitted cover images
//!
//! Objects are written under caller-chosen keys and only the key is ever
//! persisted. Backends: S3-compatible (via `object_store`) and local disk.

pub mod factory;
pub mod keys;
pub mod traits;

#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;

pub use coverdesk_core::StorageBackend;
pub use factory::create_storage;
pub use keys::submission_cover_key;
pub use traits::{Storage, StorageError, StorageResult};

#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
