use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// Moderation state of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "submission_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Pending => "pending",
            SubmissionStatus::Accepted => "accepted",
            SubmissionStatus::Rejected => "rejected",
        }
    }
}

impl Display for SubmissionStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(SubmissionStatus::Pending),
            "accepted" => Ok(SubmissionStatus::Accepted),
            "rejected" => Ok(SubmissionStatus::Rejected),
            _ => Err(anyhow::anyhow!("Invalid submission status: {}", s)),
        }
    }
}

/// A proposed catalog volume awaiting (or past) moderation
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Submission {
    pub id: i32,
    pub submitter_user_id: i32,
    pub manga_id: i32,
    /// English title of the target manga, when the series exists in the catalog
    pub manga_title: Option<String>,
    pub volume_title: String,
    pub volume_number: i32,
    pub submission_notes: Option<String>,
    /// Storage key of the sanitized cover image
    pub cover_image_key: String,
    pub status: SubmissionStatus,
    pub reviewed_by: Option<i32>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written by intake once the cover has been scanned, sanitized and stored
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub submitter_user_id: i32,
    pub manga_id: i32,
    pub volume_title: String,
    pub volume_number: i32,
    pub submission_notes: Option<String>,
    pub cover_image_key: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionListResponse {
    pub submissions: Vec<Submission>,
}

/// Filter for the admin listing
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct SubmissionFilter {
    pub status: SubmissionStatus,
}

/// Optional reviewer notes sent with accept/reject
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct ReviewRequest {
    #[serde(default)]
    pub submission_notes: Option<String>,
}

impl ReviewRequest {
    /// Notes to store with the decision. Blank notes clear the stored value.
    pub fn normalized_notes(&self) -> Option<String> {
        self.submission_notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SubmissionCreatedResponse {
    pub message: String,
    pub submission_id: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            SubmissionStatus::Pending,
            SubmissionStatus::Accepted,
            SubmissionStatus::Rejected,
        ] {
            assert_eq!(status.to_string().parse::<SubmissionStatus>().unwrap(), status);
        }
        assert!("approved".parse::<SubmissionStatus>().is_err());
    }

    #[test]
    fn test_filter_deserializes_lowercase_status() {
        let filter: SubmissionFilter = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert_eq!(filter.status, SubmissionStatus::Pending);
        assert!(serde_json::from_str::<SubmissionFilter>(r#"{"status":"nope"}"#).is_err());
    }

    #[test]
    fn test_review_notes_blank_clears() {
        let blank = ReviewRequest {
            submission_notes: Some("   ".to_string()),
        };
        assert_eq!(blank.normalized_notes(), None);
        assert_eq!(ReviewRequest::default().normalized_notes(), None);

        let notes = ReviewRequest {
            submission_notes: Some("  cover looks good ".to_string()),
        };
        assert_eq!(notes.normalized_notes().as_deref(), Some("cover looks good"));
    }
}
