//! Notification repository.

use std::sync::Arc;

use crate::entities::{Notification, notification};
use crate::map_db_err;
use crate::retry::RetryPolicy;
use examdesk_common::AppResult;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

/// Notification repository for database operations.
#[derive(Clone)]
pub struct NotificationRepository {
    db: Arc<DatabaseConnection>,
    retry: RetryPolicy,
}

impl NotificationRepository {
    /// Create a new notification repository.
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

    /// Create a new notification.
    pub async fn create(&self, model: notification::ActiveModel) -> AppResult<notification::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Get notifications for a user, newest first.
    pub async fn find_by_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> AppResult<Vec<notification::Model>> {
        self.retry
            .run_read(|| {
                Notification::find()
                    .filter(notification::Column::UserId.eq(user_id))
                    .order_by_desc(notification::Column::CreatedAt)
                    .limit(limit)
                    .all(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Mark a notification as read, scoped to its owner.
    ///
    /// Both id and owner must match; otherwise zero rows are affected and
    /// that is not an error. Returns the number of rows affected.
    pub async fn mark_as_read(&self, id: &str, user_id: &str) -> AppResult<u64> {
        let result = Notification::update_many()
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::UserId.eq(user_id))
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .col_expr(
                notification::Column::ReadAt,
                Expr::value(chrono::Utc::now()),
            )
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.retry
            .run_read(|| {
                Notification::find()
                    .filter(notification::Column::UserId.eq(user_id))
                    .filter(notification::Column::IsRead.eq(false))
                    .count(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Delete a notification, scoped to its owner. Returns rows affected.
    pub async fn delete_scoped(&self, id: &str, user_id: &str) -> AppResult<u64> {
        let result = Notification::delete_many()
            .filter(notification::Column::Id.eq(id))
            .filter(notification::Column::UserId.eq(user_id))
            .exec(self.db.as_ref())
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected)
    }

    /// Delete notifications older than a cutoff. Returns rows affected.
    pub async fn delete_older_than(
        &self,
        cutoff: chrono::DateTime<chrono::Utc>,
        only_if_read: bool,
    ) -> AppResult<u64> {
        let mut query = Notification::delete_many()
            .filter(notification::Column::CreatedAt.lt(cutoff));

        if only_if_read {
            query = query.filter(notification::Column::IsRead.eq(true));
        }

        let result = query.exec(self.db.as_ref()).await.map_err(map_db_err)?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::notification::NotificationType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_notification(id: &str, user_id: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Complaint Status Updated".to_string(),
            message: "Your complaint has been resolved.".to_string(),
            notification_type: NotificationType::Success,
            related_id: Some("c1".to_string()),
            is_read: false,
            read_at: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let n = create_test_notification("n1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[n.clone()]])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let result = repo.find_by_user("u1", 20).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].user_id, "u1");
    }

    #[tokio::test]
    async fn test_mark_as_read_wrong_owner_is_noop() {
        // The WHERE clause scopes by both id and owner; a mismatched owner
        // affects zero rows and that is success, not an error.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let affected = repo.mark_as_read("n1", "someone-else").await.unwrap();

        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_mark_as_read_owner_matches() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let affected = repo.mark_as_read("n1", "u1").await.unwrap();

        assert_eq!(affected, 1);
    }

    #[tokio::test]
    async fn test_delete_older_than() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 4,
                }])
                .into_connection(),
        );

        let repo = NotificationRepository::new(db);
        let cutoff = Utc::now() - chrono::Duration::days(30);
        let removed = repo.delete_older_than(cutoff, true).await.unwrap();

        assert_eq!(removed, 4);
    }
}
