//! Caller identity and admin capability checks

pub mod admin;
pub mod jwt;
pub mod models;

pub use admin::AdminGuard;
pub use jwt::JwtVerifier;
pub use models::{AuthUser, Claims};
