//! Statistics service.
//!
//! Admin dashboard overview and filtered analytics.

use chrono::{Datelike, TimeZone, Utc};
use examdesk_common::AppResult;
use examdesk_db::{
    entities::{complaint, complaint::ComplaintStatus, user::UserRole},
    repositories::{
        StatsRepository, UserRepository,
        stats::{ResolutionTimes, StatusCount, TrendPoint, TypeCount},
    },
};
use sea_orm::{ColumnTrait, Condition};
use serde::{Deserialize, Serialize};

/// Days of history shown in the trend view.
const TREND_DAYS: u64 = 30;

/// Dashboard overview numbers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    /// Registered students.
    pub total_students: u64,
    /// All complaints ever submitted.
    pub total_complaints: u64,
    /// Complaints awaiting triage.
    pub pending_review: u64,
    /// Complaints resolved since the start of the current month.
    pub resolved_this_month: u64,
    /// Registered admins.
    pub active_admins: u64,
    /// Mean days from creation to resolution, when anything is resolved.
    pub avg_resolution_days: Option<f64>,
}

/// Filters applied to the analytics view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsFilter {
    /// Only complaints created on or after this day.
    pub start_date: Option<chrono::NaiveDate>,
    /// Only complaints created on or before this day.
    pub end_date: Option<chrono::NaiveDate>,
    /// Only complaints currently in this status.
    pub status: Option<ComplaintStatus>,
    /// Only complaints of this type.
    pub complaint_type: Option<String>,
}

/// Aggregate analytics summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    /// Complaints matching the filter.
    pub total_complaints: u64,
    /// Percentage currently resolved.
    pub resolution_rate: f64,
    /// Percentage currently pending.
    pub pending_rate: f64,
}

/// The analytics view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    /// Daily volume, oldest first.
    pub trends: Vec<TrendPoint>,
    /// Counts per status, in lifecycle order.
    pub status_distribution: Vec<StatusCount>,
    /// Counts per complaint type, most frequent first.
    pub type_distribution: Vec<TypeCount>,
    /// Resolution time aggregates in days.
    pub resolution_times: ResolutionTimes,
    /// Headline numbers.
    pub summary: AnalyticsSummary,
}

/// Statistics service for business logic.
#[derive(Clone)]
pub struct StatsService {
    stats_repo: StatsRepository,
    user_repo: UserRepository,
}

impl StatsService {
    /// Create a new statistics service.
    #[must_use]
    pub const fn new(stats_repo: StatsRepository, user_repo: UserRepository) -> Self {
        Self {
            stats_repo,
            user_repo,
        }
    }

    /// Dashboard overview numbers.
    pub async fn overview(&self) -> AppResult<OverviewStats> {
        let now = Utc::now();
        let start_of_month = Utc
            .with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(now);

        let total_students = self.user_repo.count_by_role(UserRole::Student).await?;
        let active_admins = self.user_repo.count_by_role(UserRole::Admin).await?;
        let total_complaints = self.stats_repo.count_complaints(Condition::all()).await?;
        let pending_review = self
            .stats_repo
            .count_by_status(ComplaintStatus::Pending)
            .await?;
        let resolved_this_month = self.stats_repo.count_resolved_since(start_of_month).await?;
        let resolution = self.stats_repo.resolution_times(Condition::all()).await?;

        Ok(OverviewStats {
            total_students,
            total_complaints,
            pending_review,
            resolved_this_month,
            active_admins,
            avg_resolution_days: resolution.avg_days,
        })
    }

    /// Filtered analytics for the admin view.
    pub async fn analytics(&self, filter: AnalyticsFilter) -> AppResult<Analytics> {
        let condition = build_condition(&filter);

        let mut trends = self
            .stats_repo
            .daily_trend(condition.clone(), TREND_DAYS)
            .await?;
        // The query returns the most recent days; present chronologically.
        trends.reverse();

        let status_distribution = self.stats_repo.status_distribution(condition.clone()).await?;
        let type_distribution = self.stats_repo.type_distribution(condition.clone()).await?;
        let resolution_times = self.stats_repo.resolution_times(condition.clone()).await?;
        let total_complaints = self.stats_repo.count_complaints(condition).await?;

        let summary = AnalyticsSummary {
            total_complaints,
            resolution_rate: rate_of(&status_distribution, &ComplaintStatus::Resolved, total_complaints),
            pending_rate: rate_of(&status_distribution, &ComplaintStatus::Pending, total_complaints),
        };

        Ok(Analytics {
            trends,
            status_distribution,
            type_distribution,
            resolution_times,
            summary,
        })
    }
}

fn build_condition(filter: &AnalyticsFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(start) = filter.start_date {
        condition = condition.add(complaint::Column::CreatedAt.gte(start));
    }
    if let Some(end) = filter.end_date {
        condition = condition.add(
            complaint::Column::CreatedAt.lt(end.succ_opt().unwrap_or(end)),
        );
    }
    if let Some(status) = &filter.status {
        condition = condition.add(complaint::Column::Status.eq(status.clone()));
    }
    if let Some(complaint_type) = &filter.complaint_type {
        condition = condition.add(complaint::Column::ComplaintType.eq(complaint_type.clone()));
    }
    condition
}

#[allow(clippy::cast_precision_loss)]
fn rate_of(distribution: &[StatusCount], status: &ComplaintStatus, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let count = distribution
        .iter()
        .find(|entry| entry.status == *status)
        .map_or(0, |entry| entry.count);
    (count as f64 / total as f64) * 100.0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, EntityTrait, QueryFilter, QueryTrait};

    #[test]
    fn test_rate_of_empty_set_is_zero() {
        assert_eq!(rate_of(&[], &ComplaintStatus::Resolved, 0), 0.0);
    }

    #[test]
    fn test_rate_of_counts_matching_status() {
        let distribution = vec![
            StatusCount {
                status: ComplaintStatus::Pending,
                count: 3,
            },
            StatusCount {
                status: ComplaintStatus::Resolved,
                count: 1,
            },
        ];
        assert_eq!(rate_of(&distribution, &ComplaintStatus::Resolved, 4), 25.0);
        assert_eq!(rate_of(&distribution, &ComplaintStatus::Pending, 4), 75.0);
    }

    #[test]
    fn test_build_condition_applies_filters() {
        let filter = AnalyticsFilter {
            start_date: chrono::NaiveDate::from_ymd_opt(2025, 1, 1),
            end_date: None,
            status: Some(ComplaintStatus::Pending),
            complaint_type: Some("grading".to_string()),
        };

        let sql = complaint::Entity::find()
            .filter(build_condition(&filter))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(sql.contains("created_at"));
        assert!(sql.contains("pending"));
        assert!(sql.contains("grading"));
    }

    #[test]
    fn test_build_condition_empty_filter_matches_all() {
        let sql = complaint::Entity::find()
            .filter(build_condition(&AnalyticsFilter::default()))
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains("WHERE"), "unexpected WHERE in: {sql}");
    }
}
