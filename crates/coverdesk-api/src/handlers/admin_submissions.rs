//! Moderation endpoints. Every handler re-checks admin status in the store.

use super::parse_optional_json;
use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use coverdesk_core::models::{
    MessageResponse, ReviewRequest, SubmissionFilter, SubmissionListResponse, SubmissionPatch,
    SubmissionPatchBody, SubmissionStatus,
};
use coverdesk_core::AppError;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusQuery {
    /// Used when the request has no JSON body
    pub status: Option<String>,
}

/// Resolve the listing filter: JSON body first, then `?status=`.
fn resolve_filter(body: &Bytes, query: StatusQuery) -> Result<SubmissionStatus, AppError> {
    if !body.iter().all(u8::is_ascii_whitespace) {
        let filter: SubmissionFilter = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid filters: {}", e)))?;
        return Ok(filter.status);
    }

    let status = query
        .status
        .ok_or_else(|| AppError::BadRequest("Missing status filter".to_string()))?;
    status
        .parse()
        .map_err(|e: anyhow::Error| AppError::BadRequest(format!("Invalid filters: {}", e)))
}

#[utoipa::path(
    get,
    path = "/admin/submissions",
    tag = "admin",
    params(StatusQuery),
    request_body(content = SubmissionFilter, description = "Optional; takes precedence over the query string"),
    responses(
        (status = 200, description = "Submissions with the given status, newest first", body = SubmissionListResponse),
        (status = 400, description = "Missing or invalid filter", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, query, body), fields(user_id = auth.user_id))]
pub async fn list_submissions(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Query(query): Query<StatusQuery>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let status = resolve_filter(&body, query)?;
    state.admin.require_admin(auth.user_id).await?;

    let submissions = state.submissions.list_by_status(status).await?;
    Ok(Json(SubmissionListResponse { submissions }))
}

#[utoipa::path(
    post,
    path = "/admin/submissions/{id}/accept",
    tag = "admin",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body(content = ReviewRequest, description = "Optional reviewer notes"),
    responses(
        (status = 200, description = "Submission accepted and volume published", body = MessageResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 409, description = "Submission already accepted", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(user_id = auth.user_id))]
pub async fn accept_submission(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    state.admin.require_admin(auth.user_id).await?;
    let review: ReviewRequest = parse_optional_json(&body)?;

    let outcome = state
        .moderation
        .accept(id, auth.user_id, review.normalized_notes())
        .await?;
    tracing::info!(
        submission_id = id,
        volume_id = ?outcome.volume_id,
        "Submission accepted"
    );

    Ok(Json(MessageResponse::new("Submission accepted")))
}

#[utoipa::path(
    post,
    path = "/admin/submissions/{id}/reject",
    tag = "admin",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body(content = ReviewRequest, description = "Optional reviewer notes"),
    responses(
        (status = 200, description = "Submission rejected", body = MessageResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(user_id = auth.user_id))]
pub async fn reject_submission(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    state.admin.require_admin(auth.user_id).await?;
    let review: ReviewRequest = parse_optional_json(&body)?;

    let outcome = state
        .moderation
        .reject(id, auth.user_id, review.normalized_notes())
        .await?;
    tracing::info!(
        submission_id = id,
        volumes_removed = outcome.volumes_touched,
        "Submission rejected"
    );

    Ok(Json(MessageResponse::new("Submission rejected")))
}

#[utoipa::path(
    patch,
    path = "/admin/submissions/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "Submission ID")),
    request_body(content = SubmissionPatchBody, description = "Any of manga_id, volume_title, volume_number, status"),
    responses(
        (status = 200, description = "Submission updated", body = MessageResponse),
        (status = 400, description = "No editable fields, invalid value, or status set to accepted", body = ErrorResponse),
        (status = 401, description = "Missing or invalid session", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse),
        (status = 404, description = "Submission not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, body), fields(user_id = auth.user_id))]
pub async fn update_submission(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(id): Path<i32>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    // Promotion to accepted is refused before the privilege check.
    let patch = SubmissionPatch::try_from(parse_optional_json::<SubmissionPatchBody>(&body)?)?;
    patch.validate()?;
    state.admin.require_admin(auth.user_id).await?;

    let outcome = state.moderation.edit(id, patch).await?;
    tracing::info!(
        submission_id = id,
        from = %outcome.transition.from,
        to = %outcome.transition.to,
        volumes_touched = outcome.volumes_touched,
        "Submission updated"
    );

    Ok(Json(MessageResponse::new("Submission updated")))
}
