//! Coverdesk Database Library
//!
//! PostgreSQL repositories for submissions, the catalog volumes they publish and
//! the administrator lookup used for privileged actions.

pub mod db;

pub use db::transaction::with_transaction;
pub use db::{
    DerivedVolumeKey, ModerationOutcome, ModerationRepository, SubmissionRepository,
    UserRepository, VolumeRepository,
};
