//! Database transaction utilities
//!
//! Multi-statement moderation steps run through [`with_transaction`] so that a
//! failure anywhere rolls back every write made so far.

use coverdesk_core::AppError;
use sqlx::{PgPool, Postgres, Transaction};
use std::future::Future;
use std::pin::Pin;

/// Execute a closure within a database transaction
///
/// Commits when the closure returns `Ok`, rolls back otherwise. Errors from
/// begin/commit surface as `AppError::Persistence`.
///
/// ```ignore
/// with_transaction(&pool, |tx| {
///     Box::pin(async move {
///         sqlx::query("UPDATE ...").execute(&mut **tx).await?;
///         Ok(())
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<T, F>(pool: &PgPool, f: F) -> Result<T, AppError>
where
    F: for<'a> FnOnce(
        &'a mut Transaction<'static, Postgres>,
    ) -> Pin<Box<dyn Future<Output = Result<T, AppError>> + Send + 'a>>,
{
    let mut tx = pool.begin().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to begin transaction");
        AppError::Persistence(e)
    })?;

    match f(&mut tx).await {
        Ok(result) => {
            tx.commit().await.map_err(|e| {
                tracing::error!(error = %e, "Failed to commit transaction");
                AppError::Persistence(e)
            })?;
            Ok(result)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(
                    error = %rollback_err,
                    original_error = %e,
                    "Failed to rollback transaction"
                );
            }
            Err(e)
        }
    }
}
