//! Application state shared by all handlers.

use crate::auth::{AdminGuard, JwtVerifier};
use crate::services::intake::SubmissionIntake;
use coverdesk_core::Config;
use coverdesk_db::{ModerationRepository, SubmissionRepository, UserRepository};
use coverdesk_services::{
    BlobPublisher, ContentSafetyPipeline, ContentScanner, ImageSanitizer, Storage,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub pool: PgPool,
    pub jwt: JwtVerifier,
    pub admin: AdminGuard,
    pub submissions: SubmissionRepository,
    pub moderation: ModerationRepository,
    pub intake: SubmissionIntake,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    /// Wire repositories and services around an existing pool, scanner and
    /// storage backend.
    pub fn new(
        config: Config,
        pool: PgPool,
        scanner: Arc<dyn ContentScanner>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        let submissions = SubmissionRepository::new(pool.clone());
        let safety = ContentSafetyPipeline::new(scanner, ImageSanitizer::new());
        let publisher = BlobPublisher::new(
            storage.clone(),
            Duration::from_secs(config.storage_upload_timeout_secs()),
        );

        Self {
            jwt: JwtVerifier::new(config.jwt_secret()),
            admin: AdminGuard::new(UserRepository::new(pool.clone())),
            moderation: ModerationRepository::new(pool.clone()),
            intake: SubmissionIntake::new(safety, publisher, submissions.clone()),
            submissions,
            storage,
            pool,
            config,
        }
    }
}
