//! Typed admin edit payload.
//!
//! Only `manga_id`, `volume_title`, `volume_number` and `status` are editable.
//! Every other key in the request body is ignored, and empty values count as
//! absent.

use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::submission::SubmissionStatus;
use crate::error::AppError;

/// Partial update of a submission. `None` means "not supplied".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionPatch {
    pub manga_id: Option<i32>,
    pub volume_title: Option<String>,
    pub volume_number: Option<i32>,
    pub status: Option<SubmissionStatus>,
}

/// Wire shape of the edit body, kept loose so unknown keys and empty values
/// can be dropped instead of failing deserialization.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SubmissionPatchBody {
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub manga_id: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub volume_title: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<i32>)]
    pub volume_number: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<SubmissionStatus>)]
    pub status: Option<Value>,
}

impl SubmissionPatch {
    /// Parse a raw JSON edit body.
    pub fn from_json(body: &[u8]) -> Result<Self, AppError> {
        let body: SubmissionPatchBody = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;
        Self::try_from(body)
    }

    pub fn is_empty(&self) -> bool {
        self.manga_id.is_none()
            && self.volume_title.is_none()
            && self.volume_number.is_none()
            && self.status.is_none()
    }

    /// True when the patch touches fields copied into a published volume.
    pub fn touches_catalog_fields(&self) -> bool {
        self.manga_id.is_some() || self.volume_title.is_some() || self.volume_number.is_some()
    }

    /// Reject patches that can never be applied through the edit path.
    ///
    /// A status target of `accepted` is checked first: promotion is only
    /// possible through the accept operation, which also creates the volume.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.status == Some(SubmissionStatus::Accepted) {
            return Err(AppError::InvalidTransition(
                "Cannot set status to accepted through an edit; use the accept endpoint"
                    .to_string(),
            ));
        }
        if self.is_empty() {
            return Err(AppError::NoFieldsToUpdate);
        }
        Ok(())
    }
}

impl TryFrom<SubmissionPatchBody> for SubmissionPatch {
    type Error = AppError;

    fn try_from(body: SubmissionPatchBody) -> Result<Self, Self::Error> {
        let status = match non_empty(body.status) {
            Some(Value::String(s)) => Some(s.parse::<SubmissionStatus>().map_err(|_| {
                AppError::BadRequest(format!(
                    "Invalid status '{}': expected pending, accepted or rejected",
                    s
                ))
            })?),
            Some(other) => {
                return Err(AppError::BadRequest(format!(
                    "Invalid status value: {}",
                    other
                )))
            }
            None => None,
        };

        Ok(SubmissionPatch {
            manga_id: integer_field("manga_id", body.manga_id)?,
            volume_title: match non_empty(body.volume_title) {
                Some(Value::String(s)) => Some(s),
                Some(other) => Some(other.to_string()),
                None => None,
            },
            volume_number: integer_field("volume_number", body.volume_number)?,
            status,
        })
    }
}

/// Drop `null` and `""` so they read as "not supplied".
fn non_empty(value: Option<Value>) -> Option<Value> {
    match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(v) => Some(v),
    }
}

fn integer_field(name: &str, value: Option<Value>) -> Result<Option<i32>, AppError> {
    let invalid = || AppError::BadRequest(format!("{} must be an integer", name));
    match non_empty(value) {
        None => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse::<i32>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}
