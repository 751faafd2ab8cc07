//! Error types module
//!
//! All failures in the submission pipeline and the moderation workflow are
//! unified under [`AppError`]. Each variant describes how it should be presented
//! to clients through the [`ErrorMetadata`] trait; the HTTP mapping itself lives
//! in the API crate.
//!
//! The `Persistence` variant wraps `sqlx::Error` when the `sqlx` feature is on.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected errors such as validation failures
    Debug,
    /// Client-caused rejections worth noticing (unsafe uploads, forbidden access)
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UNSAFE_CONTENT")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Unsafe content detected: {0}")]
    UnsafeContent(String),

    #[error("Virus scanner unavailable: {0}")]
    ScanUnavailable(String),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Submission already reviewed: {0}")]
    AlreadyReviewed(String),

    #[error("No valid fields to update")]
    NoFieldsToUpdate,

    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Persistence(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Persistence(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Persistence(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::Unauthenticated(_) => (
            401,
            "UNAUTHENTICATED",
            false,
            Some("Sign in again to obtain a fresh session"),
            false,
            LogLevel::Debug,
        ),
        AppError::Forbidden(_) => (
            403,
            "FORBIDDEN",
            false,
            Some("This action requires additional privileges"),
            false,
            LogLevel::Warn,
        ),
        AppError::UnsafeContent(_) => (
            400,
            "UNSAFE_CONTENT",
            false,
            Some("Upload a different file"),
            true,
            LogLevel::Warn,
        ),
        // Fail-closed: clients see a scanner outage exactly like a detection.
        // Only the log level and `error_type` tell them apart.
        AppError::ScanUnavailable(_) => (
            400,
            "UNSAFE_CONTENT",
            false,
            Some("Upload a different file"),
            true,
            LogLevel::Error,
        ),
        AppError::UnsupportedFormat(_) => (
            400,
            "UNSUPPORTED_FORMAT",
            false,
            Some("Upload a PNG or JPEG image"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::StorageUnavailable(_) => (
            500,
            "STORAGE_UNAVAILABLE",
            true,
            Some("Retry the upload later"),
            true,
            LogLevel::Error,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the submission ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::InvalidTransition(_) => (
            400,
            "INVALID_TRANSITION",
            false,
            Some("Use the accept endpoint to accept a submission"),
            false,
            LogLevel::Debug,
        ),
        AppError::AlreadyReviewed(_) => (
            409,
            "ALREADY_REVIEWED",
            false,
            Some("Reload the submission before reviewing it again"),
            false,
            LogLevel::Debug,
        ),
        AppError::NoFieldsToUpdate => (
            400,
            "NO_FIELDS_TO_UPDATE",
            false,
            Some("Provide at least one of manga_id, volume_title, volume_number, status"),
            false,
            LogLevel::Debug,
        ),
        AppError::Persistence(_) => (
            500,
            "PERSISTENCE_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::BadRequest(_) => "BadRequest",
            AppError::Unauthenticated(_) => "Unauthenticated",
            AppError::Forbidden(_) => "Forbidden",
            AppError::UnsafeContent(_) => "UnsafeContent",
            AppError::ScanUnavailable(_) => "ScanUnavailable",
            AppError::UnsupportedFormat(_) => "UnsupportedFormat",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::StorageUnavailable(_) => "StorageUnavailable",
            AppError::NotFound(_) => "NotFound",
            AppError::InvalidTransition(_) => "InvalidTransition",
            AppError::AlreadyReviewed(_) => "AlreadyReviewed",
            AppError::NoFieldsToUpdate => "NoFieldsToUpdate",
            AppError::Persistence(_) => "PersistenceError",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::Unauthenticated(ref msg) => msg.clone(),
            AppError::Forbidden(ref msg) => msg.clone(),
            // Never echo the signature name back to the uploader.
            AppError::UnsafeContent(_) | AppError::ScanUnavailable(_) => {
                "Uploaded file failed the safety scan".to_string()
            }
            AppError::UnsupportedFormat(_) => {
                "File is not a supported image (PNG or JPEG)".to_string()
            }
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::StorageUnavailable(_) => "Failed to store image".to_string(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::InvalidTransition(ref msg) => msg.clone(),
            AppError::AlreadyReviewed(ref msg) => msg.clone(),
            AppError::NoFieldsToUpdate => "No valid fields to update".to_string(),
            AppError::Persistence(_) => "Failed to access database".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
