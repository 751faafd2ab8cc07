//! Database repositories
//!
//! Reads go straight to the pool. Every state change of a submission goes
//! through [`ModerationRepository`], which locks the submission row and applies
//! the catalog side effect in the same transaction.

pub mod moderation;
pub mod submission;
pub mod transaction;
pub mod user;
pub mod volume;

pub use moderation::{ModerationOutcome, ModerationRepository};
pub use submission::SubmissionRepository;
pub use user::UserRepository;
pub use volume::{DerivedVolumeKey, VolumeRepository};
