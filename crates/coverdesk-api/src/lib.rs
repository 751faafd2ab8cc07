//! Coverdesk API Library
//!
//! HTTP handlers, authentication, and application setup for the cover
//! submission service.

mod api_doc;
mod handlers;
mod services;
mod telemetry;
mod utils;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::intake::{SubmissionForm, SubmissionIntake};
