//! Coverdesk image processing
//!
//! Every accepted upload is decoded to pixels and re-encoded before it is
//! stored. See [`ImageSanitizer`].

pub mod image;

pub use crate::image::{CanonicalFormat, ImageSanitizer, SanitizedImage};
