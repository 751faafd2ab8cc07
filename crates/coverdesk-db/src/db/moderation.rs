use coverdesk_core::models::{SubmissionPatch, SubmissionStatus};
use coverdesk_core::moderation::{plan_accept, plan_edit, plan_reject, Transition, VolumeEffect};
use coverdesk_core::AppError;
use sqlx::{PgConnection, PgPool};

use super::submission::{lock_submission, LockedSubmission};
use super::transaction::with_transaction;
use super::volume::{delete_derived, insert_volume, sync_derived, DerivedVolumeKey};

/// Result of a committed moderation step
#[derive(Debug, Clone)]
pub struct ModerationOutcome {
    pub submission_id: i32,
    pub transition: Transition,
    /// Id of the volume created by an accept
    pub volume_id: Option<i32>,
    /// Number of volume rows removed or updated by the step
    pub volumes_touched: u64,
}

/// Transactional state changes of submissions.
///
/// Each operation locks the submission row, plans the transition from the
/// status it reads under that lock, and writes the submission together with
/// its volume side effect. Nothing is visible until commit.
#[derive(Clone)]
pub struct ModerationRepository {
    pool: PgPool,
}

impl ModerationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Accept a submission and publish its volume.
    #[tracing::instrument(skip(self, notes))]
    pub async fn accept(
        &self,
        submission_id: i32,
        reviewer_id: i32,
        notes: Option<String>,
    ) -> Result<ModerationOutcome, AppError> {
        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let current = lock_submission(&mut **tx, submission_id).await?;
                let transition = plan_accept(current.status)?;

                let volume_id =
                    insert_volume(&mut **tx, &derived_key(&current), &current.volume_title)
                        .await?;
                record_decision(
                    &mut **tx,
                    submission_id,
                    transition.to,
                    reviewer_id,
                    notes.as_deref(),
                )
                .await?;

                Ok(ModerationOutcome {
                    submission_id,
                    transition,
                    volume_id: Some(volume_id),
                    volumes_touched: 1,
                })
            })
        })
        .await
    }

    /// Reject a submission. Rejecting an accepted submission unpublishes its volume.
    #[tracing::instrument(skip(self, notes))]
    pub async fn reject(
        &self,
        submission_id: i32,
        reviewer_id: i32,
        notes: Option<String>,
    ) -> Result<ModerationOutcome, AppError> {
        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let current = lock_submission(&mut **tx, submission_id).await?;
                let transition = plan_reject(current.status);

                let volumes_touched =
                    apply_volume_effect(&mut **tx, &current, transition.volume, None).await?;
                record_decision(
                    &mut **tx,
                    submission_id,
                    transition.to,
                    reviewer_id,
                    notes.as_deref(),
                )
                .await?;

                Ok(ModerationOutcome {
                    submission_id,
                    transition,
                    volume_id: None,
                    volumes_touched,
                })
            })
        })
        .await
    }

    /// Apply an admin edit of allow-listed fields.
    ///
    /// Fails with `InvalidTransition` for a status target of accepted and with
    /// `NoFieldsToUpdate` for an empty patch.
    #[tracing::instrument(skip(self, patch))]
    pub async fn edit(
        &self,
        submission_id: i32,
        patch: SubmissionPatch,
    ) -> Result<ModerationOutcome, AppError> {
        patch.validate()?;

        with_transaction(&self.pool, move |tx| {
            Box::pin(async move {
                let current = lock_submission(&mut **tx, submission_id).await?;
                let transition = plan_edit(current.status, &patch)?;

                let volumes_touched =
                    apply_volume_effect(&mut **tx, &current, transition.volume, Some(&patch))
                        .await?;
                apply_patch(&mut **tx, submission_id, &patch).await?;

                Ok(ModerationOutcome {
                    submission_id,
                    transition,
                    volume_id: None,
                    volumes_touched,
                })
            })
        })
        .await
    }
}

fn derived_key(submission: &LockedSubmission) -> DerivedVolumeKey {
    DerivedVolumeKey {
        manga_id: submission.manga_id,
        volume_number: submission.volume_number,
        cover_image_key: submission.cover_image_key.clone(),
    }
}

async fn apply_volume_effect(
    conn: &mut PgConnection,
    current: &LockedSubmission,
    effect: VolumeEffect,
    patch: Option<&SubmissionPatch>,
) -> Result<u64, AppError> {
    let key = derived_key(current);
    match effect {
        VolumeEffect::None | VolumeEffect::Create => Ok(0),
        VolumeEffect::Delete => {
            let removed = delete_derived(conn, &key).await?;
            if removed == 0 {
                tracing::warn!(
                    submission_id = current.id,
                    manga_id = key.manga_id,
                    volume_number = key.volume_number,
                    "Accepted submission had no published volume to remove"
                );
            }
            Ok(removed)
        }
        VolumeEffect::Sync => {
            let patch = patch.cloned().unwrap_or_default();
            let title = patch
                .volume_title
                .as_deref()
                .unwrap_or(&current.volume_title);
            sync_derived(
                conn,
                &key,
                patch.manga_id.unwrap_or(current.manga_id),
                title,
                patch.volume_number.unwrap_or(current.volume_number),
            )
            .await
        }
    }
}

async fn record_decision(
    conn: &mut PgConnection,
    submission_id: i32,
    status: SubmissionStatus,
    reviewer_id: i32,
    notes: Option<&str>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE manga_volume_submissions
        SET status = $2,
            reviewed_by = $3,
            reviewed_at = NOW(),
            submission_notes = $4,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(submission_id)
    .bind(status)
    .bind(reviewer_id)
    .bind(notes)
    .execute(conn)
    .await?;

    Ok(())
}

async fn apply_patch(
    conn: &mut PgConnection,
    submission_id: i32,
    patch: &SubmissionPatch,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE manga_volume_submissions
        SET manga_id = COALESCE($2, manga_id),
            volume_title = COALESCE($3, volume_title),
            volume_number = COALESCE($4, volume_number),
            status = COALESCE($5, status),
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(submission_id)
    .bind(patch.manga_id)
    .bind(patch.volume_title.as_deref())
    .bind(patch.volume_number)
    .bind(patch.status)
    .execute(conn)
    .await?;

    Ok(())
}
