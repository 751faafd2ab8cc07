use chrono::Utc;
use coverdesk_api::auth::Claims;
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::PgPool;

pub const TEST_SECRET: &str = "test-secret-key-min-32-characters-long-for-testing";

fn sign(claims: &Claims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to sign token")
}

fn claims_for(user_id: i32, exp: i64) -> Claims {
    Claims {
        user_id,
        username: Some(format!("user{}", user_id)),
        email: None,
        exp,
        iat: Some(Utc::now().timestamp()),
    }
}

/// A valid session token for `user_id`, good for an hour.
pub fn token_for(user_id: i32) -> String {
    sign(
        &claims_for(user_id, Utc::now().timestamp() + 3600),
        TEST_SECRET,
    )
}

pub fn expired_token(user_id: i32) -> String {
    sign(
        &claims_for(user_id, Utc::now().timestamp() - 60),
        TEST_SECRET,
    )
}

/// Signed with a key the service does not know.
pub fn forged_token(user_id: i32) -> String {
    sign(
        &claims_for(user_id, Utc::now().timestamp() + 3600),
        "some-other-secret-that-is-also-32-characters",
    )
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

pub async fn insert_user(pool: &PgPool, username: &str, is_admin: bool) -> i32 {
    sqlx::query_scalar(
        "INSERT INTO users (username, email, user_type) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(username)
    .bind(format!("{}@example.com", username))
    .bind(if is_admin { "admin" } else { "user" })
    .fetch_one(pool)
    .await
    .expect("Failed to insert user")
}
