//! Route configuration and setup.

mod health;

use crate::api_doc::ApiDoc;
use crate::handlers::{admin_submissions, submissions};
use crate::state::AppState;
use axum::{
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    routing::{get, patch, post},
    BoxError, Json, Router,
};
use coverdesk_core::Config;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Multipart framing and the text fields on top of the image itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let body_limit = config.max_upload_size_bytes() + FORM_OVERHEAD_BYTES;
    let request_timeout = Duration::from_secs(config.request_timeout_secs());

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/submissions", post(submissions::create_submission))
        .route(
            "/submissions/users/{user_id}",
            get(submissions::list_user_submissions),
        )
        .route("/submissions/{id}", get(submissions::get_submission))
        .route(
            "/admin/submissions",
            get(admin_submissions::list_submissions),
        )
        .route(
            "/admin/submissions/{id}",
            patch(admin_submissions::update_submission),
        )
        .route(
            "/admin/submissions/{id}/accept",
            post(admin_submissions::accept_submission),
        )
        .route(
            "/admin/submissions/{id}/reject",
            post(admin_submissions::reject_submission),
        )
        .merge(utoipa_rapidoc::RapiDoc::new("/openapi.json").path("/docs"))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_timeout_error))
                .timeout(request_timeout),
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, String) {
    if err.is::<tower::timeout::error::Elapsed>() {
        tracing::warn!("Request timed out");
        (StatusCode::REQUEST_TIMEOUT, "Request timed out".to_string())
    } else {
        tracing::error!(error = %err, "Unhandled middleware error");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    }
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PATCH,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        // Session cookies need credentialed CORS.
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
            ])
            .allow_credentials(true)
    };
    Ok(cors)
}
