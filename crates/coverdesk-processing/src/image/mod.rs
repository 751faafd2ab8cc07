//! Image sanitization module

pub mod sanitizer;

pub use sanitizer::{CanonicalFormat, ImageSanitizer, SanitizedImage};
