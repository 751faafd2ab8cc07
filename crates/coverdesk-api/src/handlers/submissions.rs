//! Submitter-facing endpoints

use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::utils::upload::extract_submission_form;
use axum::{
    extract::{Multipart, Path, State},
    response::IntoResponse,
    Json,
};
use coverdesk_core::models::{Submission, SubmissionCreatedResponse, SubmissionListResponse};
use coverdesk_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    post,
    path = "/submissions",
    tag = "submissions",
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "manga_id, volume_title, volume_number, submission_notes and one image file"),
    responses(
        (status = 200, description = "Submission created", body = SubmissionCreatedResponse),
        (status = 400, description = "Invalid form, unsafe or unsupported image, or scanner unreachable", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 413, description = "Upload too large", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = auth.user_id))]
pub async fn create_submission(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = extract_submission_form(multipart, state.config.max_upload_size_bytes()).await?;
    let submission_id = state.intake.submit(auth.user_id, form).await?;

    Ok(Json(SubmissionCreatedResponse {
        message: "Submission created".to_string(),
        submission_id,
    }))
}

#[utoipa::path(
    get,
    path = "/submissions/users/{user_id}",
    tag = "submissions",
    params(("user_id" = i32, Path, description = "Submitter user ID")),
    responses(
        (status = 200, description = "The caller's submissions, newest first", body = SubmissionListResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Listing another user's submissions", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(caller_id = auth.user_id))]
pub async fn list_user_submissions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, HttpAppError> {
    if auth.user_id != user_id {
        return Err(AppError::Forbidden(
            "Cannot list another user's submissions".to_string(),
        )
        .into());
    }

    let submissions = state.submissions.list_by_submitter(user_id).await?;
    Ok(Json(SubmissionListResponse { submissions }))
}

#[utoipa::path(
    get,
    path = "/submissions/{id}",
    tag = "submissions",
    params(("id" = i32, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "Submission found", body = Submission),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Submission>, HttpAppError> {
    let submission = state.submissions.get(id).await?;
    Ok(Json(submission))
}
