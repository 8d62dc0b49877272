//! Password reset service.
//!
//! Single-use, time-limited reset tokens delivered by email.

use chrono::Utc;
use examdesk_common::{AppError, AppResult, IdGenerator};
use examdesk_db::{
    entities::{password_reset_token, user::UserRole},
    repositories::{PasswordResetTokenRepository, UserRepository},
};
use sea_orm::Set;

use crate::services::account::hash_password;
use crate::services::email::EmailService;

/// Token lifetime in hours.
const TOKEN_TTL_HOURS: i64 = 1;

/// Password reset service for business logic.
#[derive(Clone)]
pub struct PasswordResetService {
    user_repo: UserRepository,
    token_repo: PasswordResetTokenRepository,
    email: EmailService,
    id_gen: IdGenerator,
}

impl PasswordResetService {
    /// Create a new password reset service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        token_repo: PasswordResetTokenRepository,
        email: EmailService,
    ) -> Self {
        Self {
            user_repo,
            token_repo,
            email,
            id_gen: IdGenerator::new(),
        }
    }

    /// Issue a reset token and email the reset link.
    pub async fn request(&self, email: &str, role: UserRole) -> AppResult<()> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {email}")))?;

        let token = self.id_gen.generate_token();
        let model = password_reset_token::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user.id.clone()),
            role: Set(role),
            token: Set(token.clone()),
            expires_at: Set((Utc::now() + chrono::Duration::hours(TOKEN_TTL_HOURS)).into()),
            created_at: Set(Utc::now().into()),
        };
        self.token_repo.create(model).await?;

        self.email
            .send_password_reset(&user.email, &token, &user.id)
            .await?;

        Ok(())
    }

    /// Consume a reset token and set the new password.
    pub async fn reset(&self, token: &str, user_id: &str, new_password: &str) -> AppResult<()> {
        if new_password.len() < 8 {
            return Err(AppError::Validation(
                "password: must be at least 8 characters".to_string(),
            ));
        }

        let record = self
            .token_repo
            .find_by_token_and_user(token, user_id)
            .await?
            .ok_or_else(|| AppError::Validation("Invalid or expired token".to_string()))?;

        if record.expires_at < Utc::now() {
            return Err(AppError::Validation("Token expired".to_string()));
        }

        self.user_repo
            .update_password(user_id, hash_password(new_password)?)
            .await?;

        self.token_repo.consume(token, user_id).await?;

        Ok(())
    }
}
