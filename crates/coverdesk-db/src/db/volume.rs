use coverdesk_core::models::Volume;
use coverdesk_core::AppError;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Row};

/// Identifies the volume published from a submission.
///
/// The cover key is unique per upload, so at most one catalog row matches
/// even when the series already has another volume with the same number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedVolumeKey {
    pub manga_id: i32,
    pub volume_number: i32,
    pub cover_image_key: String,
}

/// Read access to catalog volumes
#[derive(Clone)]
pub struct VolumeRepository {
    pool: PgPool,
}

impl VolumeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The volume currently derived from a submission, if any.
    pub async fn find_derived(&self, key: &DerivedVolumeKey) -> Result<Option<Volume>, AppError> {
        let row = sqlx::query_as::<_, VolumeRow>(
            r#"
            SELECT id, manga_id, title, volume_number, thumbnail_s3_key, created_at
            FROM volumes
            WHERE manga_id = $1 AND volume_number = $2 AND thumbnail_s3_key = $3
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(key.manga_id)
        .bind(key.volume_number)
        .bind(&key.cover_image_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.0))
    }

    pub async fn list_for_manga(&self, manga_id: i32) -> Result<Vec<Volume>, AppError> {
        let rows = sqlx::query_as::<_, VolumeRow>(
            r#"
            SELECT id, manga_id, title, volume_number, thumbnail_s3_key, created_at
            FROM volumes
            WHERE manga_id = $1
            ORDER BY volume_number, id
            "#,
        )
        .bind(manga_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}

pub(crate) async fn insert_volume(
    conn: &mut PgConnection,
    key: &DerivedVolumeKey,
    title: &str,
) -> Result<i32, AppError> {
    let id: i32 = sqlx::query_scalar(
        r#"
        INSERT INTO volumes (manga_id, title, volume_number, thumbnail_s3_key)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(key.manga_id)
    .bind(title)
    .bind(key.volume_number)
    .bind(&key.cover_image_key)
    .fetch_one(conn)
    .await?;

    Ok(id)
}

/// Delete the single volume matching `key`. Returns the number of rows removed.
pub(crate) async fn delete_derived(
    conn: &mut PgConnection,
    key: &DerivedVolumeKey,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        DELETE FROM volumes
        WHERE id = (
            SELECT id FROM volumes
            WHERE manga_id = $1 AND volume_number = $2 AND thumbnail_s3_key = $3
            ORDER BY id
            LIMIT 1
        )
        "#,
    )
    .bind(key.manga_id)
    .bind(key.volume_number)
    .bind(&key.cover_image_key)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Copy edited catalog fields onto the volume matching `key`.
pub(crate) async fn sync_derived(
    conn: &mut PgConnection,
    key: &DerivedVolumeKey,
    manga_id: i32,
    title: &str,
    volume_number: i32,
) -> Result<u64, AppError> {
    let result = sqlx::query(
        r#"
        UPDATE volumes
        SET manga_id = $4, title = $5, volume_number = $6
        WHERE id = (
            SELECT id FROM volumes
            WHERE manga_id = $1 AND volume_number = $2 AND thumbnail_s3_key = $3
            ORDER BY id
            LIMIT 1
        )
        "#,
    )
    .bind(key.manga_id)
    .bind(key.volume_number)
    .bind(&key.cover_image_key)
    .bind(manga_id)
    .bind(title)
    .bind(volume_number)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

struct VolumeRow(Volume);

impl<'r> sqlx::FromRow<'r, PgRow> for VolumeRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(VolumeRow(Volume {
            id: row.try_get("id")?,
            manga_id: row.try_get("manga_id")?,
            title: row.try_get("title")?,
            volume_number: row.try_get("volume_number")?,
            thumbnail_s3_key: row.try_get("thumbnail_s3_key")?,
            created_at: row.try_get("created_at")?,
        }))
    }
}
