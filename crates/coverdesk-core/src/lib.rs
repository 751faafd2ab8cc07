//! Coverdesk Core Library
//!
//! Domain models, the moderation state machine, error types and configuration
//! shared by every coverdesk crate.

pub mod config;
pub mod error;
pub mod models;
pub mod moderation;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, SubmissionServiceConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
