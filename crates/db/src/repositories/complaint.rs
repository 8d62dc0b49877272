//! Complaint repository.

use std::sync::Arc;

use crate::entities::{
    Complaint, complaint,
    complaint::ComplaintStatus,
    status_history,
};
use crate::map_db_err;
use crate::retry::RetryPolicy;
use examdesk_common::AppResult;
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

/// Complaint repository for database operations.
#[derive(Clone)]
pub struct ComplaintRepository {
    db: Arc<DatabaseConnection>,
    retry: RetryPolicy,
}

impl ComplaintRepository {
    /// Create a new complaint repository.
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

    /// Create a new complaint.
    pub async fn create(&self, model: complaint::ActiveModel) -> AppResult<complaint::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Find a complaint by ID, restricted by a visibility condition.
    ///
    /// The same condition the list path uses is applied here, so a
    /// complaint outside the caller's scope is indistinguishable from one
    /// that does not exist.
    pub async fn find_by_id_scoped(
        &self,
        id: &str,
        scope: Condition,
    ) -> AppResult<Option<complaint::Model>> {
        self.retry
            .run_read(|| {
                Complaint::find_by_id(id)
                    .filter(scope.clone())
                    .one(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// List complaints visible under a condition, newest first.
    pub async fn list_scoped(
        &self,
        scope: Condition,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        self.retry
            .run_read(|| {
                Complaint::find()
                    .filter(scope.clone())
                    .order_by_desc(complaint::Column::CreatedAt)
                    .limit(limit)
                    .offset(offset)
                    .all(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Apply a status transition and record it, atomically.
    ///
    /// Runs read-modify-append in one transaction with an exclusive row
    /// lock on the complaint, so two concurrent transitions serialize and
    /// the history log always matches the final status. Returns `None`
    /// when the complaint does not exist. Never retried: after a commit
    /// ambiguity the caller must re-issue the whole request.
    pub async fn update_status_recorded(
        &self,
        complaint_id: &str,
        new_status: ComplaintStatus,
        history_id: String,
        changed_by: &str,
        changed_by_name: &str,
        notes: Option<String>,
    ) -> AppResult<Option<(complaint::Model, status_history::Model)>> {
        let txn = self.db.begin().await.map_err(map_db_err)?;

        let Some(current) = Complaint::find_by_id(complaint_id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(map_db_err)?
        else {
            txn.rollback().await.map_err(map_db_err)?;
            return Ok(None);
        };

        let now = chrono::Utc::now();
        let old_status = current.status.clone();

        let mut active: complaint::ActiveModel = current.into();
        active.status = Set(new_status.clone());
        active.updated_at = Set(Some(now.into()));
        let updated = active.update(&txn).await.map_err(map_db_err)?;

        let entry = status_history::ActiveModel {
            id: Set(history_id),
            complaint_id: Set(complaint_id.to_string()),
            old_status: Set(Some(old_status)),
            new_status: Set(new_status),
            changed_by: Set(changed_by.to_string()),
            changed_by_name: Set(changed_by_name.to_string()),
            notes: Set(notes),
            created_at: Set(now.into()),
        };
        let entry = entry.insert(&txn).await.map_err(map_db_err)?;

        txn.commit().await.map_err(map_db_err)?;
        Ok(Some((updated, entry)))
    }
}
