use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// JWT claims issued by the identity service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: i32,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// Verified caller identity.
///
/// Extracting it runs the token check, so a handler that takes `AuthUser`
/// never executes for an unauthenticated request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i32,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = HttpAppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let claims = state.jwt.authenticate(&parts.headers)?;
        Ok(AuthUser {
            user_id: claims.user_id,
        })
    }
}
