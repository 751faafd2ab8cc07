//! Multipart intake for cover submissions

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use coverdesk_core::AppError;

pub const IMAGE_FIELD: &str = "image";

/// Parsed submission form. The image is still untrusted here.
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    pub manga_id: i32,
    pub volume_title: String,
    pub volume_number: i32,
    pub submission_notes: Option<String>,
    pub image: Vec<u8>,
}

/// Read the submission form from a multipart body.
///
/// Numeric fields coerce to 0 when they do not parse, unknown fields are
/// ignored, and exactly one non-empty `image` field is required.
pub async fn extract_submission_form(
    mut multipart: Multipart,
    max_image_bytes: usize,
) -> Result<SubmissionForm, AppError> {
    let mut form = SubmissionForm::default();
    let mut image: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();

        match field_name.as_str() {
            IMAGE_FIELD => {
                if image.is_some() {
                    return Err(AppError::BadRequest(
                        "Multiple image fields are not allowed; send exactly one field named 'image'"
                            .to_string(),
                    ));
                }
                let data = field.bytes().await.map_err(multipart_error)?;
                validate_file_size(data.len(), max_image_bytes)?;
                image = Some(data.to_vec());
            }
            "manga_id" => form.manga_id = parse_int_field(&field.text().await.map_err(multipart_error)?),
            "volume_number" => {
                form.volume_number = parse_int_field(&field.text().await.map_err(multipart_error)?)
            }
            "volume_title" => form.volume_title = field.text().await.map_err(multipart_error)?,
            "submission_notes" => {
                form.submission_notes = normalize_notes(field.text().await.map_err(multipart_error)?)
            }
            _ => {}
        }
    }

    form.image = image
        .filter(|data| !data.is_empty())
        .ok_or_else(|| AppError::BadRequest("No image provided".to_string()))?;

    Ok(form)
}

/// Validate file size
pub fn validate_file_size(file_size: usize, max_size: usize) -> Result<(), AppError> {
    if file_size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        )));
    }
    Ok(())
}

/// Best-effort integer parse; anything unparseable is 0.
pub fn parse_int_field(value: &str) -> i32 {
    value.trim().parse().unwrap_or(0)
}

/// Empty notes are stored as NULL.
pub fn normalize_notes(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(e.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart: {}", e.body_text()))
    }
}
