//! Statistics repository.
//!
//! Aggregate queries over complaints for the admin dashboard and the
//! analytics view. Read-only.

use std::sync::Arc;

use crate::entities::{Complaint, complaint, complaint::ComplaintStatus};
use crate::map_db_err;
use crate::retry::RetryPolicy;
use examdesk_common::AppResult;
use sea_orm::sea_query::{Expr, Order};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, prelude::Date,
};

/// One day of complaint volume, split by status.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, serde::Serialize)]
pub struct TrendPoint {
    /// Calendar day the complaints were created on.
    pub day: Date,
    /// Complaints created that day.
    pub total: i64,
    /// Of those, currently pending.
    pub pending: i64,
    /// Of those, currently under review.
    pub under_review: i64,
    /// Of those, currently resolved.
    pub resolved: i64,
}

/// Complaint count per status.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, serde::Serialize)]
pub struct StatusCount {
    /// The status bucket.
    pub status: ComplaintStatus,
    /// Number of complaints in it.
    pub count: i64,
}

/// Complaint count per complaint type.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult, serde::Serialize)]
pub struct TypeCount {
    /// The complaint type bucket.
    pub complaint_type: String,
    /// Number of complaints in it.
    pub count: i64,
}

/// Resolution time aggregates, in days. NULL when nothing is resolved yet.
#[derive(Debug, Clone, Default, PartialEq, FromQueryResult, serde::Serialize)]
pub struct ResolutionTimes {
    /// Mean days from creation to resolution.
    pub avg_days: Option<f64>,
    /// Fastest resolution in days.
    pub min_days: Option<f64>,
    /// Slowest resolution in days.
    pub max_days: Option<f64>,
}

const RESOLUTION_DAYS_EXPR: &str =
    "EXTRACT(EPOCH FROM (updated_at - created_at)) / 86400.0";

/// Statistics repository for aggregate queries.
#[derive(Clone)]
pub struct StatsRepository {
    db: Arc<DatabaseConnection>,
    retry: RetryPolicy,
}

impl StatsRepository {
    /// Create a new statistics repository.
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

    /// Count complaints matching a filter.
    pub async fn count_complaints(&self, filter: Condition) -> AppResult<u64> {
        self.retry
            .run_read(|| {
                Complaint::find()
                    .filter(filter.clone())
                    .count(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Count complaints in a status.
    pub async fn count_by_status(&self, status: ComplaintStatus) -> AppResult<u64> {
        self.count_complaints(Condition::all().add(complaint::Column::Status.eq(status)))
            .await
    }

    /// Count complaints resolved since a point in time.
    pub async fn count_resolved_since(
        &self,
        since: chrono::DateTime<chrono::Utc>,
    ) -> AppResult<u64> {
        self.count_complaints(
            Condition::all()
                .add(complaint::Column::Status.eq(ComplaintStatus::Resolved))
                .add(complaint::Column::UpdatedAt.gte(since)),
        )
        .await
    }

    /// Resolution-time aggregates over resolved complaints matching a filter.
    pub async fn resolution_times(&self, filter: Condition) -> AppResult<ResolutionTimes> {
        let result = self
            .retry
            .run_read(|| {
                Complaint::find()
                    .select_only()
                    .column_as(
                        Expr::cust(format!("CAST(AVG({RESOLUTION_DAYS_EXPR}) AS DOUBLE PRECISION)")),
                        "avg_days",
                    )
                    .column_as(
                        Expr::cust(format!("CAST(MIN({RESOLUTION_DAYS_EXPR}) AS DOUBLE PRECISION)")),
                        "min_days",
                    )
                    .column_as(
                        Expr::cust(format!("CAST(MAX({RESOLUTION_DAYS_EXPR}) AS DOUBLE PRECISION)")),
                        "max_days",
                    )
                    .filter(filter.clone())
                    .filter(complaint::Column::Status.eq(ComplaintStatus::Resolved))
                    .filter(complaint::Column::UpdatedAt.is_not_null())
                    .into_model::<ResolutionTimes>()
                    .one(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)?;

        Ok(result.unwrap_or_default())
    }

    /// Complaint counts grouped by status, in lifecycle order.
    pub async fn status_distribution(&self, filter: Condition) -> AppResult<Vec<StatusCount>> {
        self.retry
            .run_read(|| {
                Complaint::find()
                    .select_only()
                    .column(complaint::Column::Status)
                    .column_as(Expr::cust("COUNT(*)"), "count")
                    .filter(filter.clone())
                    .group_by(complaint::Column::Status)
                    .order_by(
                        Expr::cust(
                            "CASE status WHEN 'pending' THEN 1 WHEN 'under-review' THEN 2 \
                             WHEN 'resolved' THEN 3 ELSE 4 END",
                        ),
                        Order::Asc,
                    )
                    .into_model::<StatusCount>()
                    .all(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Complaint counts grouped by complaint type, most frequent first.
    pub async fn type_distribution(&self, filter: Condition) -> AppResult<Vec<TypeCount>> {
        self.retry
            .run_read(|| {
                Complaint::find()
                    .select_only()
                    .column(complaint::Column::ComplaintType)
                    .column_as(Expr::cust("COUNT(*)"), "count")
                    .filter(filter.clone())
                    .group_by(complaint::Column::ComplaintType)
                    .order_by(Expr::cust("count"), Order::Desc)
                    .into_model::<TypeCount>()
                    .all(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Daily complaint volume, most recent `days` calendar days with data.
    pub async fn daily_trend(&self, filter: Condition, days: u64) -> AppResult<Vec<TrendPoint>> {
        self.retry
            .run_read(|| {
                Complaint::find()
                    .select_only()
                    .column_as(Expr::cust("CAST(created_at AS DATE)"), "day")
                    .column_as(Expr::cust("COUNT(*)"), "total")
                    .column_as(
                        Expr::cust("COUNT(*) FILTER (WHERE status = 'pending')"),
                        "pending",
                    )
                    .column_as(
                        Expr::cust("COUNT(*) FILTER (WHERE status = 'under-review')"),
                        "under_review",
                    )
                    .column_as(
                        Expr::cust("COUNT(*) FILTER (WHERE status = 'resolved')"),
                        "resolved",
                    )
                    .filter(filter.clone())
                    .group_by(Expr::cust("CAST(created_at AS DATE)"))
                    .order_by(Expr::cust("day"), Order::Desc)
                    .limit(days)
                    .into_model::<TrendPoint>()
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
    use sea_orm::{DatabaseBackend, MockDatabase, Value};
    use std::collections::BTreeMap;

    #[tokio::test]
    async fn test_resolution_times_empty_set_is_default() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
                .into_connection(),
        );

        let repo = StatsRepository::new(db);
        let times = repo.resolution_times(Condition::all()).await.unwrap();

        assert_eq!(times, ResolutionTimes::default());
    }

    #[tokio::test]
    async fn test_resolution_times_row() {
        let row = BTreeMap::from([
            ("avg_days", Value::Double(Some(2.5))),
            ("min_days", Value::Double(Some(1.0))),
            ("max_days", Value::Double(Some(6.0))),
        ]);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[row]])
                .into_connection(),
        );

        let repo = StatsRepository::new(db);
        let times = repo.resolution_times(Condition::all()).await.unwrap();

        assert_eq!(times.avg_days, Some(2.5));
        assert_eq!(times.max_days, Some(6.0));
    }
}
