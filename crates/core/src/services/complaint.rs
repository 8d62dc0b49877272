//! Complaint service.
//!
//! Submission, scope-filtered reads, the status-transition workflow, and
//! admin responses.

use chrono::Utc;
use examdesk_common::{AppError, AppResult, IdGenerator};
use examdesk_db::entities::{
    complaint::{self, ComplaintStatus},
    notification::NotificationType,
    response, status_history,
    user::{self, UserRole},
};
use examdesk_db::repositories::{
    ComplaintRepository, ResponseRepository, StatusHistoryRepository, UserRepository,
};
use sea_orm::{Condition, Set};
use serde::Deserialize;
use validator::Validate;

use crate::services::email::EmailService;
use crate::services::notification::{CreateNotificationInput, NotificationService};
use crate::services::scope::ComplaintScope;
use crate::session::SessionActor;

/// Hard cap on complaint listings.
const MAX_LIST_LIMIT: u64 = 100;

/// Input for submitting a complaint.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintInput {
    #[validate(length(min = 1, max = 255, message = "Full name is required"))]
    pub full_name: String,

    #[validate(length(min = 1, max = 50, message = "Student ID is required"))]
    pub student_id: String,

    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    #[validate(length(min = 1, max = 255, message = "Exam name is required"))]
    pub exam_name: String,

    pub exam_date: chrono::NaiveDate,

    #[validate(length(min = 1, max = 255, message = "Complaint type is required"))]
    pub complaint_type: String,

    #[validate(length(min = 10, message = "Description must be at least 10 characters"))]
    pub description: String,

    #[validate(length(min = 5, message = "Desired resolution must be at least 5 characters"))]
    pub desired_resolution: String,

    #[validate(length(max = 255))]
    pub course: Option<String>,

    #[validate(length(max = 255))]
    pub department: Option<String>,

    #[validate(length(max = 255))]
    pub faculty: Option<String>,

    #[validate(url(message = "Invalid evidence URL"))]
    pub evidence_url: Option<String>,
}

/// A complaint with its responses and, for admins, its status history.
#[derive(Debug, Clone)]
pub struct ComplaintDetail {
    /// The complaint itself.
    pub complaint: complaint::Model,
    /// Admin responses, newest first.
    pub responses: Vec<response::Model>,
    /// Status transitions, newest first; `None` for non-admin actors.
    pub status_history: Option<Vec<status_history::Model>>,
}

/// Result of a status transition.
#[derive(Debug, Clone)]
pub struct StatusUpdateOutcome {
    /// The status now in effect.
    pub status: ComplaintStatus,
    /// Full transition log, newest first.
    pub history: Vec<status_history::Model>,
}

/// Complaint service for business logic.
#[derive(Clone)]
pub struct ComplaintService {
    complaint_repo: ComplaintRepository,
    response_repo: ResponseRepository,
    history_repo: StatusHistoryRepository,
    user_repo: UserRepository,
    notifications: NotificationService,
    email: EmailService,
    id_gen: IdGenerator,
}

impl ComplaintService {
    /// Create a new complaint service.
    #[must_use]
    pub const fn new(
        complaint_repo: ComplaintRepository,
        response_repo: ResponseRepository,
        history_repo: StatusHistoryRepository,
        user_repo: UserRepository,
        notifications: NotificationService,
        email: EmailService,
    ) -> Self {
        Self {
            complaint_repo,
            response_repo,
            history_repo,
            user_repo,
            notifications,
            email,
            id_gen: IdGenerator::new(),
        }
    }

    /// Submit a new complaint owned by the session user.
    pub async fn submit(
        &self,
        actor: &SessionActor,
        input: SubmitComplaintInput,
    ) -> AppResult<complaint::Model> {
        input.validate()?;

        let model = complaint::ActiveModel {
            id: Set(self.id_gen.generate()),
            reference_number: Set(self.id_gen.generate_reference_number()),
            user_id: Set(actor.user_id.clone()),
            full_name: Set(input.full_name),
            student_id: Set(input.student_id),
            email: Set(input.email),
            phone: Set(input.phone),
            exam_name: Set(input.exam_name),
            exam_date: Set(input.exam_date),
            complaint_type: Set(input.complaint_type),
            description: Set(input.description),
            desired_resolution: Set(input.desired_resolution),
            evidence_url: Set(input.evidence_url),
            status: Set(ComplaintStatus::Pending),
            course: Set(input.course),
            department: Set(input.department),
            faculty: Set(input.faculty),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.complaint_repo.create(model).await?;

        // Best-effort heads-up for the admin team.
        if let Err(e) = self
            .notifications
            .notify_admins(
                "New Complaint Submitted",
                &format!(
                    "A new complaint about {} has been submitted ({}).",
                    created.exam_name, created.reference_number
                ),
                NotificationType::Info,
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to notify admins about new complaint");
        }

        Ok(created)
    }

    /// List complaints visible to the actor, newest first.
    pub async fn list(
        &self,
        actor: &SessionActor,
        limit: u64,
        offset: u64,
    ) -> AppResult<Vec<complaint::Model>> {
        let scope = ComplaintScope::for_actor(actor);
        self.complaint_repo
            .list_scoped(scope.to_condition(), limit.clamp(1, MAX_LIST_LIMIT), offset)
            .await
    }

    /// Fetch one complaint with responses and, for admins, history.
    ///
    /// A complaint outside the actor's scope is reported as `NotFound`,
    /// exactly like one that does not exist.
    pub async fn get(&self, actor: &SessionActor, id: &str) -> AppResult<ComplaintDetail> {
        let scope = ComplaintScope::for_actor(actor);
        let complaint = self
            .complaint_repo
            .find_by_id_scoped(id, scope.to_condition())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("complaint {id}")))?;

        let responses = self.response_repo.list_for_complaint(id).await?;

        let status_history = if actor.is_admin() {
            Some(self.history_repo.list_for_complaint(id).await?)
        } else {
            None
        };

        Ok(ComplaintDetail {
            complaint,
            responses,
            status_history,
        })
    }

    /// Apply a status transition.
    ///
    /// The read-modify-append runs in one transaction; only after it
    /// commits is the owner notified, and a notification failure never
    /// surfaces to the caller.
    pub async fn update_status(
        &self,
        actor: &SessionActor,
        complaint_id: &str,
        new_status: ComplaintStatus,
        notes: Option<String>,
    ) -> AppResult<StatusUpdateOutcome> {
        let admin = self.ensure_admin(actor).await?;

        let (updated, _entry) = self
            .complaint_repo
            .update_status_recorded(
                complaint_id,
                new_status,
                self.id_gen.generate(),
                &admin.id,
                &admin.full_name(),
                notes,
            )
            .await?
            .ok_or_else(|| AppError::NotFound(format!("complaint {complaint_id}")))?;

        let notification_type = if updated.status == ComplaintStatus::Resolved {
            NotificationType::Success
        } else {
            NotificationType::Info
        };

        if let Err(e) = self
            .notifications
            .create(CreateNotificationInput {
                user_id: updated.user_id.clone(),
                title: "Complaint Status Updated".to_string(),
                message: format!(
                    "Your complaint about {} status has been changed to \"{}\".",
                    updated.exam_name,
                    updated.status.as_str()
                ),
                notification_type,
                related_id: Some(updated.id.clone()),
            })
            .await
        {
            tracing::warn!(error = %e, "Failed to create status notification");
        }

        if let Err(e) = self
            .email
            .send_status_update(
                &updated.email,
                &updated.exam_name,
                updated.status.as_str(),
                &updated.id,
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to send status email");
        }

        let history = self.history_repo.list_for_complaint(complaint_id).await?;

        Ok(StatusUpdateOutcome {
            status: updated.status,
            history,
        })
    }

    /// Add an admin response to a complaint.
    pub async fn add_response(
        &self,
        actor: &SessionActor,
        complaint_id: &str,
        body: &str,
    ) -> AppResult<response::Model> {
        let admin = self.ensure_admin(actor).await?;

        if body.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Response body must not be empty".to_string(),
            ));
        }

        let complaint = self
            .complaint_repo
            .find_by_id_scoped(complaint_id, Condition::all())
            .await?
            .ok_or_else(|| AppError::NotFound(format!("complaint {complaint_id}")))?;

        let model = response::ActiveModel {
            id: Set(self.id_gen.generate()),
            complaint_id: Set(complaint.id.clone()),
            author_id: Set(admin.id.clone()),
            author_name: Set(admin.full_name()),
            body: Set(body.trim().to_string()),
            created_at: Set(Utc::now().into()),
        };
        let created = self.response_repo.create(model).await?;

        if let Err(e) = self
            .notifications
            .create(CreateNotificationInput {
                user_id: complaint.user_id.clone(),
                title: "New Response to Your Complaint".to_string(),
                message: format!(
                    "An administrator has responded to your complaint about {}.",
                    complaint.exam_name
                ),
                notification_type: NotificationType::Info,
                related_id: Some(complaint.id.clone()),
            })
            .await
        {
            tracing::warn!(error = %e, "Failed to create response notification");
        }

        if let Err(e) = self
            .email
            .send_response_notification(
                &complaint.email,
                &complaint.exam_name,
                &created.body,
                &created.author_name,
                &complaint.id,
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to send response email");
        }

        Ok(created)
    }

    /// Resolve the actor's admin identity from the users table.
    async fn ensure_admin(&self, actor: &SessionActor) -> AppResult<user::Model> {
        if !actor.is_admin() {
            return Err(AppError::Unauthorized);
        }
        self.user_repo
            .find_by_id_and_role(&actor.user_id, UserRole::Admin)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use examdesk_common::Config;
    use examdesk_common::config::{DatabaseConfig, EmailConfig, ServerConfig};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn disabled_email() -> EmailService {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                url: "https://examdesk.example.edu".to_string(),
            },
            database: DatabaseConfig {
                url: "postgres://localhost/examdesk".to_string(),
                max_connections: 10,
                min_connections: 2,
                acquire_timeout_secs: 10,
            },
            email: EmailConfig::default(),
        };
        EmailService::new(&config).unwrap()
    }

    fn service_with(db: DatabaseConnection) -> ComplaintService {
        let db = Arc::new(db);
        ComplaintService::new(
            ComplaintRepository::new(Arc::clone(&db)),
            ResponseRepository::new(Arc::clone(&db)),
            StatusHistoryRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            NotificationService::new(
                examdesk_db::repositories::NotificationRepository::new(Arc::clone(&db)),
                UserRepository::new(db),
            ),
            disabled_email(),
        )
    }

    fn admin_actor() -> SessionActor {
        SessionActor {
            user_id: "adm1".to_string(),
            role: "admin".to_string(),
            position: Some("system-administrator".to_string()),
            department: None,
            faculty: None,
            courses: None,
        }
    }

    fn student_actor() -> SessionActor {
        SessionActor {
            user_id: "stu1".to_string(),
            role: "student".to_string(),
            position: None,
            department: None,
            faculty: None,
            courses: None,
        }
    }

    fn admin_user() -> user::Model {
        user::Model {
            id: "adm1".to_string(),
            email: "admin@example.edu".to_string(),
            password_hash: "$argon2id$test".to_string(),
            first_name: "Alan".to_string(),
            last_name: "Turing".to_string(),
            student_id: None,
            staff_id: Some("STF-1".to_string()),
            role: UserRole::Admin,
            level: None,
            position: Some(user::AdminPosition::SystemAdministrator),
            phone: None,
            department: None,
            faculty: None,
            courses: None,
            profile_pic_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
            password_updated_at: None,
        }
    }

    fn pending_complaint(id: &str) -> complaint::Model {
        complaint::Model {
            id: id.to_string(),
            reference_number: "REF-100001".to_string(),
            user_id: "stu1".to_string(),
            full_name: "Grace Hopper".to_string(),
            student_id: "S1234".to_string(),
            email: "grace@example.edu".to_string(),
            phone: None,
            exam_name: "Compilers Final".to_string(),
            exam_date: Utc::now().date_naive(),
            complaint_type: "grading".to_string(),
            description: "The second question was marked wrong.".to_string(),
            desired_resolution: "Remark the paper".to_string(),
            evidence_url: None,
            status: ComplaintStatus::Pending,
            course: Some("CS101".to_string()),
            department: Some("Computer Science".to_string()),
            faculty: Some("Science".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn history_entry(id: &str, complaint_id: &str) -> status_history::Model {
        status_history::Model {
            id: id.to_string(),
            complaint_id: complaint_id.to_string(),
            old_status: Some(ComplaintStatus::Pending),
            new_status: ComplaintStatus::Resolved,
            changed_by: "adm1".to_string(),
            changed_by_name: "Alan Turing".to_string(),
            notes: Some("fixed".to_string()),
            created_at: Utc::now().into(),
        }
    }

    fn success_notification(user_id: &str) -> examdesk_db::entities::notification::Model {
        examdesk_db::entities::notification::Model {
            id: "n1".to_string(),
            user_id: user_id.to_string(),
            title: "Complaint Status Updated".to_string(),
            message: "Your complaint about Compilers Final status has been changed to \"resolved\"."
                .to_string(),
            notification_type: NotificationType::Success,
            related_id: Some("c1".to_string()),
            is_read: false,
            read_at: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_update_status_rejects_non_admin() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service
            .update_status(&student_actor(), "c1", ComplaintStatus::Resolved, None)
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_update_status_records_history_and_notifies_owner() {
        let before = pending_complaint("c1");
        let mut after = before.clone();
        after.status = ComplaintStatus::Resolved;
        let entry = history_entry("h1", "c1");

        // Query order: admin lookup, locked read, update, history insert,
        // notification insert, history listing. A skipped notification
        // would desynchronize the sequence and fail the test.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[admin_user()]])
            .append_query_results([[before]])
            .append_query_results([[after]])
            .append_query_results([[entry.clone()]])
            .append_query_results([[success_notification("stu1")]])
            .append_query_results([[entry.clone()]])
            .into_connection();

        let service = service_with(db);
        let outcome = service
            .update_status(
                &admin_actor(),
                "c1",
                ComplaintStatus::Resolved,
                Some("fixed".to_string()),
            )
            .await
            .unwrap();

        assert_eq!(outcome.status, ComplaintStatus::Resolved);
        assert_eq!(outcome.history.len(), 1);
        assert_eq!(outcome.history[0].old_status, Some(ComplaintStatus::Pending));
        assert_eq!(outcome.history[0].new_status, ComplaintStatus::Resolved);
        assert_eq!(outcome.history[0].notes.as_deref(), Some("fixed"));
    }

    #[tokio::test]
    async fn test_update_status_missing_complaint_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[admin_user()]])
            .append_query_results([Vec::<complaint::Model>::new()])
            .into_connection();

        let service = service_with(db);
        let result = service
            .update_status(&admin_actor(), "missing", ComplaintStatus::Resolved, None)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_status_swallows_notification_failure() {
        let before = pending_complaint("c1");
        let mut after = before.clone();
        after.status = ComplaintStatus::Resolved;
        let entry = history_entry("h1", "c1");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[admin_user()]])
            .append_query_results([[before]])
            .append_query_results([[after]])
            .append_query_results([[entry.clone()]])
            .append_query_errors([sea_orm::DbErr::Custom("notification insert failed".into())])
            .append_query_results([[entry]])
            .into_connection();

        let service = service_with(db);
        let outcome = service
            .update_status(&admin_actor(), "c1", ComplaintStatus::Resolved, None)
            .await
            .unwrap();

        // The transition committed; the lost notification only warned.
        assert_eq!(outcome.status, ComplaintStatus::Resolved);
    }

    #[tokio::test]
    async fn test_get_out_of_scope_is_not_found() {
        // The scope condition filtered the row out; the caller cannot tell
        // this apart from true absence.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<complaint::Model>::new()])
            .into_connection();

        let service = service_with(db);
        let mut actor = admin_actor();
        actor.position = Some("lecturer".to_string());
        actor.courses = Some("CS101".to_string());

        let result = service.get(&actor, "c1").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_submit_rejects_short_description() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let input = SubmitComplaintInput {
            full_name: "Grace Hopper".to_string(),
            student_id: "S1234".to_string(),
            email: "grace@example.edu".to_string(),
            phone: None,
            exam_name: "Compilers Final".to_string(),
            exam_date: Utc::now().date_naive(),
            complaint_type: "grading".to_string(),
            description: "too short".to_string(),
            desired_resolution: "Remark the paper".to_string(),
            course: None,
            department: None,
            faculty: None,
            evidence_url: None,
        };

        let result = service.submit(&student_actor(), input).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_submit_creates_pending_complaint() {
        let created = pending_complaint("c9");

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[created.clone()]])
            // notify_admins: no admins registered.
            .append_query_results([Vec::<BTreeMap<&str, Value>>::new()])
            .into_connection();

        let service = service_with(db);
        let input = SubmitComplaintInput {
            full_name: "Grace Hopper".to_string(),
            student_id: "S1234".to_string(),
            email: "grace@example.edu".to_string(),
            phone: None,
            exam_name: "Compilers Final".to_string(),
            exam_date: Utc::now().date_naive(),
            complaint_type: "grading".to_string(),
            description: "The second question was marked wrong.".to_string(),
            desired_resolution: "Remark the paper".to_string(),
            course: Some("CS101".to_string()),
            department: None,
            faculty: None,
            evidence_url: None,
        };

        let result = service.submit(&student_actor(), input).await.unwrap();
        assert_eq!(result.status, ComplaintStatus::Pending);
        assert!(result.reference_number.starts_with("REF-"));
    }
}
