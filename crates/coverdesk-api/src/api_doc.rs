//! OpenAPI documentation, served at `/openapi.json`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use coverdesk_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coverdesk API",
        version = "0.1.0",
        description = "Manga volume cover submissions: upload, virus scan, sanitization and moderation into the catalog."
    ),
    paths(
        handlers::submissions::create_submission,
        handlers::submissions::list_user_submissions,
        handlers::submissions::get_submission,
        handlers::admin_submissions::list_submissions,
        handlers::admin_submissions::accept_submission,
        handlers::admin_submissions::reject_submission,
        handlers::admin_submissions::update_submission,
    ),
    components(
        schemas(
            models::Submission,
            models::SubmissionStatus,
            models::SubmissionListResponse,
            models::SubmissionFilter,
            models::SubmissionCreatedResponse,
            models::SubmissionPatchBody,
            models::ReviewRequest,
            models::MessageResponse,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "submissions", description = "Cover submission intake and lookup"),
        (name = "admin", description = "Moderation of submissions")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/submissions",
            "/submissions/users/{user_id}",
            "/submissions/{id}",
            "/admin/submissions",
            "/admin/submissions/{id}",
            "/admin/submissions/{id}/accept",
            "/admin/submissions/{id}/reject",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }
}
