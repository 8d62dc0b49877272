//! Response repository.

use std::sync::Arc;

use crate::entities::{Response, response};
use crate::map_db_err;
use crate::retry::RetryPolicy;
use examdesk_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Response repository for database operations.
#[derive(Clone)]
pub struct ResponseRepository {
    db: Arc<DatabaseConnection>,
    retry: RetryPolicy,
}

impl ResponseRepository {
    /// Create a new response repository.
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

    /// Create a new response.
    pub async fn create(&self, model: response::ActiveModel) -> AppResult<response::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// List responses for a complaint, newest first.
    pub async fn list_for_complaint(&self, complaint_id: &str) -> AppResult<Vec<response::Model>> {
        self.retry
            .run_read(|| {
                Response::find()
                    .filter(response::Column::ComplaintId.eq(complaint_id))
                    .order_by_desc(response::Column::CreatedAt)
                    .all(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }
}
