pub mod admin_submissions;
pub mod submissions;

use bytes::Bytes;
use coverdesk_core::AppError;
use serde::de::DeserializeOwned;

/// Parse an optional JSON body. An empty body yields `T::default()`.
pub(crate) fn parse_optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))
}
