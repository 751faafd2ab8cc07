//! Health check handler

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
pub(super) struct HealthCheckResponse {
    pub status: String,
    pub database: String,
    pub storage: String,
}

/// Liveness plus a database ping. Storage is reported but does not fail the check.
pub(super) async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let database =
        match tokio::time::timeout(TIMEOUT, sqlx::query("SELECT 1").execute(&state.pool)).await {
            Ok(Ok(_)) => "healthy".to_string(),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "Database health check failed");
                format!("unhealthy: {}", e)
            }
            Err(_) => "timeout".to_string(),
        };

    let storage = match tokio::time::timeout(
        TIMEOUT,
        state.storage.exists("health-check-non-existent-key"),
    )
    .await
    {
        Ok(Ok(_)) => "healthy".to_string(),
        Ok(Err(e)) => format!("degraded: {}", e),
        Err(_) => "timeout".to_string(),
    };

    let healthy = database == "healthy";
    let response = HealthCheckResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        database,
        storage,
    };

    let status_code = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(response))
}
