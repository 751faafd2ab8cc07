use chrono::{DateTime, Utc};
use coverdesk_core::models::{NewSubmission, Submission, SubmissionStatus};
use coverdesk_core::AppError;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

/// Columns shared by every submission read. `manga` is joined for display only.
const SUBMISSION_SELECT: &str = r#"
    SELECT
        s.id, s.submitter_user_id, s.manga_id, m.title_english AS manga_title,
        s.volume_title, s.volume_number, s.submission_notes, s.cover_image_key,
        s.status, s.reviewed_by, s.reviewed_at, s.created_at, s.updated_at
    FROM manga_volume_submissions s
    LEFT JOIN manga m ON m.id = s.manga_id
"#;

/// Repository for submission rows
#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new submission in the `pending` state and return its id.
    #[tracing::instrument(skip(self, submission), fields(submitter_user_id = submission.submitter_user_id))]
    pub async fn create(&self, submission: NewSubmission) -> Result<i32, AppError> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO manga_volume_submissions (
                submitter_user_id, manga_id, volume_title, volume_number,
                submission_notes, cover_image_key, status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(submission.submitter_user_id)
        .bind(submission.manga_id)
        .bind(submission.volume_title)
        .bind(submission.volume_number)
        .bind(submission.submission_notes)
        .bind(submission.cover_image_key)
        .bind(SubmissionStatus::Pending)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(submission_id = id, "Submission row created");
        Ok(id)
    }

    /// Fetch one submission. Missing rows are `NotFound`.
    pub async fn get(&self, id: i32) -> Result<Submission, AppError> {
        let query = format!("{} WHERE s.id = $1", SUBMISSION_SELECT);
        let row = sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Submission::from)
            .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))
    }

    pub async fn list_by_submitter(&self, user_id: i32) -> Result<Vec<Submission>, AppError> {
        let query = format!(
            "{} WHERE s.submitter_user_id = $1 ORDER BY s.created_at DESC, s.id DESC",
            SUBMISSION_SELECT
        );
        let rows = sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Submission::from).collect())
    }

    pub async fn list_by_status(
        &self,
        status: SubmissionStatus,
    ) -> Result<Vec<Submission>, AppError> {
        let query = format!(
            "{} WHERE s.status = $1 ORDER BY s.created_at DESC, s.id DESC",
            SUBMISSION_SELECT
        );
        let rows = sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Submission::from).collect())
    }
}

/// The fields a transition needs, read under `FOR UPDATE`.
#[derive(Debug, Clone)]
pub(crate) struct LockedSubmission {
    pub id: i32,
    pub manga_id: i32,
    pub volume_title: String,
    pub volume_number: i32,
    pub cover_image_key: String,
    pub status: SubmissionStatus,
}

/// Lock a submission row for the rest of the transaction.
///
/// Concurrent transitions on the same id queue up here, so each one plans
/// against the status left behind by the previous commit.
pub(crate) async fn lock_submission(
    conn: &mut PgConnection,
    id: i32,
) -> Result<LockedSubmission, AppError> {
    let row = sqlx::query(
        r#"
        SELECT id, manga_id, volume_title, volume_number, cover_image_key, status
        FROM manga_volume_submissions
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::NotFound("Submission not found".to_string()))?;

    Ok(LockedSubmission {
        id: row.try_get("id")?,
        manga_id: row.try_get("manga_id")?,
        volume_title: row.try_get("volume_title")?,
        volume_number: row.try_get("volume_number")?,
        cover_image_key: row.try_get("cover_image_key")?,
        status: row.try_get("status")?,
    })
}

/// Submission row as read from the database
#[derive(Debug)]
struct SubmissionRow {
    id: i32,
    submitter_user_id: i32,
    manga_id: i32,
    manga_title: Option<String>,
    volume_title: String,
    volume_number: i32,
    submission_notes: Option<String>,
    cover_image_key: String,
    status: SubmissionStatus,
    reviewed_by: Option<i32>,
    reviewed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for SubmissionRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(SubmissionRow {
            id: row.try_get("id")?,
            submitter_user_id: row.try_get("submitter_user_id")?,
            manga_id: row.try_get("manga_id")?,
            manga_title: row.try_get("manga_title")?,
            volume_title: row.try_get("volume_title")?,
            volume_number: row.try_get("volume_number")?,
            submission_notes: row.try_get("submission_notes")?,
            cover_image_key: row.try_get("cover_image_key")?,
            status: row.try_get("status")?,
            reviewed_by: row.try_get("reviewed_by")?,
            reviewed_at: row.try_get("reviewed_at")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Submission {
            id: row.id,
            submitter_user_id: row.submitter_user_id,
            manga_id: row.manga_id,
            manga_title: row.manga_title,
            volume_title: row.volume_title,
            volume_number: row.volume_number,
            submission_notes: row.submission_notes,
            cover_image_key: row.cover_image_key,
            status: row.status,
            reviewed_by: row.reviewed_by,
            reviewed_at: row.reviewed_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
