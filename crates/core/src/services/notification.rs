//! Notification service.
//!
//! Durable, per-user, append-only inbox. Rows are mutated only to flip
//! the read flag; bulk cleanup is the one delete path.

use chrono::Utc;
use examdesk_common::{AppResult, IdGenerator};
use examdesk_db::{
    entities::{
        notification::{self, NotificationType},
        user::UserRole,
    },
    repositories::{NotificationRepository, UserRepository},
};
use sea_orm::Set;

/// Hard cap on inbox listings.
const MAX_LIST_LIMIT: u64 = 100;

/// Input for creating a notification.
#[derive(Debug, Clone)]
pub struct CreateNotificationInput {
    /// Receiving user.
    pub user_id: String,
    /// Short title shown in the inbox.
    pub title: String,
    /// Full message body.
    pub message: String,
    /// Severity.
    pub notification_type: NotificationType,
    /// Related entity, usually a complaint ID.
    pub related_id: Option<String>,
}

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(
        notification_repo: NotificationRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            notification_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create an unread notification.
    pub async fn create(
        &self,
        input: CreateNotificationInput,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(input.user_id),
            title: Set(input.title),
            message: Set(input.message),
            notification_type: Set(input.notification_type),
            related_id: Set(input.related_id),
            is_read: Set(false),
            read_at: Set(None),
            created_at: Set(Utc::now().into()),
        };

        self.notification_repo.create(model).await
    }

    /// Create the same notification for every admin user.
    pub async fn notify_admins(
        &self,
        title: &str,
        message: &str,
        notification_type: NotificationType,
    ) -> AppResult<Vec<notification::Model>> {
        let admin_ids = self.user_repo.list_ids_by_role(UserRole::Admin).await?;

        let mut created = Vec::with_capacity(admin_ids.len());
        for admin_id in admin_ids {
            created.push(
                self.create(CreateNotificationInput {
                    user_id: admin_id,
                    title: title.to_string(),
                    message: message.to_string(),
                    notification_type: notification_type.clone(),
                    related_id: None,
                })
                .await?,
            );
        }
        Ok(created)
    }

    /// Get notifications for a user, newest first. The limit is clamped.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<notification::Model>> {
        self.notification_repo
            .find_by_user(user_id, limit.clamp(1, MAX_LIST_LIMIT))
            .await
    }

    /// Mark a notification as read.
    ///
    /// Scoping is enforced by requiring both id and owner to match; when
    /// they do not (wrong owner, or no such notification) zero rows are
    /// affected and the call still succeeds.
    pub async fn mark_read(&self, id: &str, user_id: &str) -> AppResult<()> {
        let affected = self.notification_repo.mark_as_read(id, user_id).await?;
        if affected == 0 {
            tracing::debug!(id, user_id, "mark_read affected no rows");
        }
        Ok(())
    }

    /// Count unread notifications for a user.
    pub async fn unread_count(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }

    /// Delete a notification, with the same owner scoping as `mark_read`.
    pub async fn delete(&self, id: &str, user_id: &str) -> AppResult<()> {
        self.notification_repo.delete_scoped(id, user_id).await?;
        Ok(())
    }

    /// Delete notifications older than `days` days. Returns count removed.
    ///
    /// Pure maintenance; may run on any cadence with no ordering guarantee
    /// relative to concurrent reads.
    pub async fn cleanup_older_than(&self, days: u32, only_if_read: bool) -> AppResult<u64> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        let removed = self
            .notification_repo
            .delete_older_than(cutoff, only_if_read)
            .await?;

        tracing::info!(removed, days, only_if_read, "Cleaned up old notifications");
        Ok(removed)
    }
}
