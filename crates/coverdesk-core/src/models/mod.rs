//! Data models for submissions, their moderation and the catalog volumes they produce.

mod patch;
mod submission;
mod volume;

pub use patch::*;
pub use submission::*;
pub use volume::*;
