use coverdesk_core::AppError;
use coverdesk_db::UserRepository;

/// Admin capability check, evaluated against the store on every call.
#[derive(Clone)]
pub struct AdminGuard {
    users: UserRepository,
}

impl AdminGuard {
    pub fn new(users: UserRepository) -> Self {
        Self { users }
    }

    /// `Forbidden` unless the user currently has `user_type = 'admin'`.
    /// Lookup failures propagate as persistence errors.
    pub async fn require_admin(&self, user_id: i32) -> Result<(), AppError> {
        if self.users.is_admin(user_id).await? {
            Ok(())
        } else {
            tracing::warn!(user_id, "Admin action refused");
            Err(AppError::Forbidden("User is not an admin".to_string()))
        }
    }
}
