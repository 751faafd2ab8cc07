//! Application setup and initialization
//!
//! Everything `main` does before serving: validate configuration, start
//! tracing, connect and migrate the database, and assemble state and routes.

pub mod database;
pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use coverdesk_core::Config;
use coverdesk_services::{create_storage, ClamAVService, ContentScanner};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Validate configuration first - fail fast on misconfiguration
    config
        .validate()
        .context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())?;
    crate::error::set_production_mode(config.is_production());

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let storage = create_storage(&config)
        .await
        .context("Failed to initialize storage backend")?;
    tracing::info!(backend = %storage.backend_type(), "Storage initialized");

    let scanner: Arc<dyn ContentScanner> = Arc::new(ClamAVService::new(
        config.clamav_host().to_string(),
        config.clamav_port(),
        config.clamav_timeout_secs(),
    ));
    tracing::info!(
        host = %config.clamav_host(),
        port = config.clamav_port(),
        "ClamAV scanning enabled"
    );

    let state = Arc::new(AppState::new(config.clone(), pool, scanner, storage));
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
