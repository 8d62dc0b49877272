//! Password reset token repository.

use std::sync::Arc;

use crate::entities::{PasswordResetToken, password_reset_token};
use crate::map_db_err;
use crate::retry::RetryPolicy;
use examdesk_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
};

/// Password reset token repository for database operations.
#[derive(Clone)]
pub struct PasswordResetTokenRepository {
    db: Arc<DatabaseConnection>,
    retry: RetryPolicy,
}

impl PasswordResetTokenRepository {
    /// Create a new password reset token repository.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            retry: RetryPolicy::default(),
        }
    }

    /// Override the read-retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Create a new reset token.
    pub async fn create(
        &self,
        model: password_reset_token::ActiveModel,
    ) -> AppResult<password_reset_token::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Find a token record by token value and user.
    pub async fn find_by_token_and_user(
        &self,
        token: &str,
        user_id: &str,
    ) -> AppResult<Option<password_reset_token::Model>> {
        self.retry
            .run_read(|| {
                PasswordResetToken::find()
                    .filter(password_reset_token::Column::Token.eq(token))
                    .filter(password_reset_token::Column::UserId.eq(user_id))
                    .one(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Consume (delete) a token after a successful reset.
    pub async fn consume(&self, token: &str, user_id: &str) -> AppResult<u64> {
        let result = PasswordResetToken::delete_many()
            .filter(password_reset_token::Column::Token.eq(token))
            .filter(password_reset_token::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }
}
