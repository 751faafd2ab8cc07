//! Moderation state machine.
//!
//! Pure transition rules for Pending / Accepted / Rejected. The database layer
//! locks the submission row, asks this module what to do given the status it
//! just read, and applies the resulting [`VolumeEffect`] in the same
//! transaction. A volume derived from a submission exists exactly while that
//! submission is accepted.

use crate::error::AppError;
use crate::models::{SubmissionPatch, SubmissionStatus};

/// What a transition does to the submission's derived catalog volume
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeEffect {
    /// No volume row is touched
    None,
    /// Insert a volume copied from the submission
    Create,
    /// Delete the volume derived from the submission
    Delete,
    /// Copy edited catalog fields onto the existing volume
    Sync,
}

/// Outcome of planning a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
    pub volume: VolumeEffect,
}

/// Accept: any non-accepted submission may be accepted. Accepting twice is
/// refused so a second volume is never created.
pub fn plan_accept(current: SubmissionStatus) -> Result<Transition, AppError> {
    if current == SubmissionStatus::Accepted {
        return Err(AppError::AlreadyReviewed(
            "Submission has already been accepted".to_string(),
        ));
    }
    Ok(Transition {
        from: current,
        to: SubmissionStatus::Accepted,
        volume: VolumeEffect::Create,
    })
}

/// Reject: always allowed. Leaving accepted removes the published volume.
pub fn plan_reject(current: SubmissionStatus) -> Transition {
    let volume = if current == SubmissionStatus::Accepted {
        VolumeEffect::Delete
    } else {
        VolumeEffect::None
    };
    Transition {
        from: current,
        to: SubmissionStatus::Rejected,
        volume,
    }
}

/// Admin edit of allow-listed fields.
pub fn plan_edit(
    current: SubmissionStatus,
    patch: &SubmissionPatch,
) -> Result<Transition, AppError> {
    patch.validate()?;

    let to = patch.status.unwrap_or(current);
    let volume = match (current, to) {
        (SubmissionStatus::Accepted, SubmissionStatus::Accepted) => {
            if patch.touches_catalog_fields() {
                VolumeEffect::Sync
            } else {
                VolumeEffect::None
            }
        }
        (SubmissionStatus::Accepted, _) => VolumeEffect::Delete,
        // validate() already refused promotion to accepted
        _ => VolumeEffect::None,
    };

    Ok(Transition {
        from: current,
        to,
        volume,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_patch(status: SubmissionStatus) -> SubmissionPatch {
        SubmissionPatch {
            status: Some(status),
            ..Default::default()
        }
    }

    #[test]
    fn test_accept_creates_volume_from_pending_or_rejected() {
        for from in [SubmissionStatus::Pending, SubmissionStatus::Rejected] {
            let t = plan_accept(from).unwrap();
            assert_eq!(t.to, SubmissionStatus::Accepted);
            assert_eq!(t.volume, VolumeEffect::Create);
        }
    }

    #[test]
    fn test_accept_twice_is_already_reviewed() {
        assert!(matches!(
            plan_accept(SubmissionStatus::Accepted),
            Err(AppError::AlreadyReviewed(_))
        ));
    }

    #[test]
    fn test_reject_only_deletes_when_leaving_accepted() {
        assert_eq!(
            plan_reject(SubmissionStatus::Accepted).volume,
            VolumeEffect::Delete
        );
        assert_eq!(
            plan_reject(SubmissionStatus::Pending).volume,
            VolumeEffect::None
        );
        assert_eq!(
            plan_reject(SubmissionStatus::Rejected).volume,
            VolumeEffect::None
        );
    }

    #[test]
    fn test_edit_out_of_accepted_deletes_volume() {
        for to in [SubmissionStatus::Rejected, SubmissionStatus::Pending] {
            let t = plan_edit(SubmissionStatus::Accepted, &status_patch(to)).unwrap();
            assert_eq!(t.to, to);
            assert_eq!(t.volume, VolumeEffect::Delete);
        }
    }

    #[test]
    fn test_edit_pending_to_rejected_touches_nothing() {
        let t = plan_edit(
            SubmissionStatus::Pending,
            &status_patch(SubmissionStatus::Rejected),
        )
        .unwrap();
        assert_eq!(t.volume, VolumeEffect::None);
    }

    #[test]
    fn test_edit_never_promotes_to_accepted() {
        for from in [
            SubmissionStatus::Pending,
            SubmissionStatus::Rejected,
            SubmissionStatus::Accepted,
        ] {
            assert!(matches!(
                plan_edit(from, &status_patch(SubmissionStatus::Accepted)),
                Err(AppError::InvalidTransition(_))
            ));
        }
    }

    #[test]
    fn test_edit_catalog_fields_while_accepted_syncs_volume() {
        let patch = SubmissionPatch {
            volume_number: Some(2),
            ..Default::default()
        };
        let t = plan_edit(SubmissionStatus::Accepted, &patch).unwrap();
        assert_eq!(t.to, SubmissionStatus::Accepted);
        assert_eq!(t.volume, VolumeEffect::Sync);

        let t = plan_edit(SubmissionStatus::Pending, &patch).unwrap();
        assert_eq!(t.volume, VolumeEffect::None);
    }

    #[test]
    fn test_edit_without_fields_fails() {
        assert!(matches!(
            plan_edit(SubmissionStatus::Pending, &SubmissionPatch::default()),
            Err(AppError::NoFieldsToUpdate)
        ));
    }
}
