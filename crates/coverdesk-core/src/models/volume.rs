use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Published catalog volume materialized from an accepted submission
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Volume {
    pub id: i32,
    pub manga_id: i32,
    pub title: String,
    pub volume_number: i32,
    /// Copied from the accepting submission's cover image key
    pub thumbnail_s3_key: Option<String>,
    pub created_at: DateTime<Utc>,
}
