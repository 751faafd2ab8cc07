//! HS256 session token verification
//!
//! Tokens are issued by the identity service and signed with the shared
//! `SECRET_KEY`. They are read from the `access_token` cookie, or from an
//! `Authorization: Bearer` header when no cookie is present.

use crate::auth::models::Claims;
use axum::http::{header, HeaderMap};
use coverdesk_core::AppError;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verify signature and expiry and return the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected session token");
                AppError::Unauthenticated("Invalid token".to_string())
            })
    }

    /// Find and verify the caller's token in the request headers.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Claims, AppError> {
        let token = extract_token(headers)
            .ok_or_else(|| AppError::Unauthenticated("No token".to_string()))?;
        self.verify(&token)
    }
}

/// Token from the `access_token` cookie, falling back to a Bearer header.
pub fn extract_token(headers: &HeaderMap) -> Option<String> {
    cookie_token(headers).or_else(|| bearer_token(headers))
}

fn cookie_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "unit-test-secret-key-with-32-plus-chars";

    fn token(secret: &str, user_id: i32, exp_offset: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            user_id,
            username: Some("reader".to_string()),
            email: None,
            exp: now + exp_offset,
            iat: Some(now),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_valid_token() {
        let verifier = JwtVerifier::new(SECRET);
        let claims = verifier.verify(&token(SECRET, 42, 3600)).unwrap();
        assert_eq!(claims.user_id, 42);
    }

    #[test]
    fn test_expired_token_rejected() {
        let verifier = JwtVerifier::new(SECRET);
        let result = verifier.verify(&token(SECRET, 42, -10));
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }

    #[test]
    fn test_wrong_signature_rejected() {
        let verifier = JwtVerifier::new(SECRET);
        let forged = token("another-secret-key-that-is-long-enough", 42, 3600);
        assert!(matches!(
            verifier.verify(&forged),
            Err(AppError::Unauthenticated(_))
        ));
    }

    #[test]
    fn test_missing_exp_rejected() {
        let verifier = JwtVerifier::new(SECRET);
        let no_exp = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "user_id": 42 }),
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        assert!(verifier.verify(&no_exp).is_err());
        assert!(verifier.verify("not.a.jwt").is_err());
    }

    #[test]
    fn test_cookie_preferred_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; access_token=from-cookie"),
        );
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );
        assert_eq!(extract_token(&headers).as_deref(), Some("from-cookie"));

        headers.remove(header::COOKIE);
        assert_eq!(extract_token(&headers).as_deref(), Some("from-header"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_token(&headers), None);
    }

    #[test]
    fn test_authenticate_without_token() {
        let verifier = JwtVerifier::new(SECRET);
        let result = verifier.authenticate(&HeaderMap::new());
        assert!(matches!(result, Err(AppError::Unauthenticated(_))));
    }
}
