//! Submission intake
//!
//! extract → scan → sanitize → upload → persist. Each stage aborts the
//! request on failure; a submission row only ever references a stored,
//! sanitized cover.

use coverdesk_core::models::NewSubmission;
use coverdesk_core::AppError;
use coverdesk_db::SubmissionRepository;
use coverdesk_services::{BlobPublisher, ContentSafetyPipeline};

pub use crate::utils::upload::SubmissionForm;

#[derive(Clone)]
pub struct SubmissionIntake {
    safety: ContentSafetyPipeline,
    publisher: BlobPublisher,
    submissions: SubmissionRepository,
}

impl SubmissionIntake {
    pub fn new(
        safety: ContentSafetyPipeline,
        publisher: BlobPublisher,
        submissions: SubmissionRepository,
    ) -> Self {
        Self {
            safety,
            publisher,
            submissions,
        }
    }

    /// Run the pipeline for one submission and return the new row id.
    #[tracing::instrument(skip(self, form), fields(manga_id = form.manga_id, volume_number = form.volume_number))]
    pub async fn submit(&self, user_id: i32, form: SubmissionForm) -> Result<i32, AppError> {
        let SubmissionForm {
            manga_id,
            volume_title,
            volume_number,
            submission_notes,
            image,
        } = form;

        let sanitized = self.safety.process(image).await?;
        let storage_key = self.publisher.publish(&volume_title, sanitized).await?;

        let created = self
            .submissions
            .create(NewSubmission {
                submitter_user_id: user_id,
                manga_id,
                volume_title,
                volume_number,
                submission_notes,
                cover_image_key: storage_key.clone(),
            })
            .await;

        match created {
            Ok(submission_id) => {
                tracing::info!(submission_id, user_id, storage_key = %storage_key, "Submission created");
                Ok(submission_id)
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    storage_key = %storage_key,
                    "Failed to persist submission, removing uploaded cover"
                );
                let publisher = self.publisher.clone();
                tokio::spawn(async move {
                    publisher.discard(&storage_key).await;
                });
                Err(e)
            }
        }
    }
}
