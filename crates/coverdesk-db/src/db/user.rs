use coverdesk_core::AppError;
use sqlx::PgPool;

/// Lookups against the identity provider's `users` table
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current admin flag for a user. Unknown users are not admins.
    pub async fn is_admin(&self, user_id: i32) -> Result<bool, AppError> {
        let is_admin: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE user_type = 'admin' AND id = $1
            )
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(is_admin)
    }
}
