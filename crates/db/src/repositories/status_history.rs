//! Status history repository.
//!
//! Inserts happen inside the complaint repository's status transaction;
//! this repository only reads the append-only log.

use std::sync::Arc;

use crate::entities::{StatusHistory, status_history};
use crate::map_db_err;
use crate::retry::RetryPolicy;
use examdesk_common::AppResult;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Status history repository for database operations.
#[derive(Clone)]
pub struct StatusHistoryRepository {
    db: Arc<DatabaseConnection>,
    retry: RetryPolicy,
}

impl StatusHistoryRepository {
    /// Create a new status history repository.
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

    /// List transitions for a complaint, newest first.
    pub async fn list_for_complaint(
        &self,
        complaint_id: &str,
    ) -> AppResult<Vec<status_history::Model>> {
        self.retry
            .run_read(|| {
                StatusHistory::find()
                    .filter(status_history::Column::ComplaintId.eq(complaint_id))
                    .order_by_desc(status_history::Column::CreatedAt)
                    .all(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::complaint::ComplaintStatus;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_list_for_complaint() {
        let entry = status_history::Model {
            id: "h1".to_string(),
            complaint_id: "c1".to_string(),
            old_status: Some(ComplaintStatus::Pending),
            new_status: ComplaintStatus::UnderReview,
            changed_by: "admin1".to_string(),
            changed_by_name: "Alan Turing".to_string(),
            notes: None,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[entry.clone()]])
                .into_connection(),
        );

        let repo = StatusHistoryRepository::new(db);
        let result = repo.list_for_complaint("c1").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].new_status, ComplaintStatus::UnderReview);
    }
}
