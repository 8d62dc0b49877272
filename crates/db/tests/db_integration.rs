//! Database integration tests.
//!
//! These tests require a running `PostgreSQL` instance.
//! Run with: `cargo test --test db_integration -- --ignored`
//!
//! Environment variables:
//!   `TEST_DB_HOST` (default: localhost)
//!   `TEST_DB_PORT` (default: 5433)
//!   `TEST_DB_USER` (default: `examdesk_test`)
//!   `TEST_DB_PASSWORD` (default: `examdesk_test`)
//!   `TEST_DB_NAME` (default: `examdesk_test`)

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use examdesk_db::entities::{complaint, complaint::ComplaintStatus, user, user::UserRole};
use examdesk_db::repositories::{ComplaintRepository, StatusHistoryRepository, UserRepository};
use examdesk_db::test_utils::{TestDatabase, TestDbConfig};
use sea_orm::Set;

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_connection() {
    let config = TestDbConfig::default();
    let result = TestDatabase::with_config(config).await;
    assert!(result.is_ok(), "Failed to connect: {:?}", result.err());
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_database_cleanup() {
    let db = TestDatabase::new().await.expect("Failed to connect");
    let result = db.cleanup().await;
    assert!(result.is_ok(), "Cleanup failed: {:?}", result.err());
}

fn test_user(id: &str, email: &str, role: UserRole) -> user::ActiveModel {
    user::ActiveModel {
        id: Set(id.to_string()),
        email: Set(email.to_string()),
        password_hash: Set("$argon2id$test".to_string()),
        first_name: Set("Test".to_string()),
        last_name: Set("User".to_string()),
        role: Set(role),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    }
}

fn test_complaint(id: &str, user_id: &str) -> complaint::ActiveModel {
    complaint::ActiveModel {
        id: Set(id.to_string()),
        reference_number: Set(format!("REF-9{id:0>5}")),
        user_id: Set(user_id.to_string()),
        full_name: Set("Test User".to_string()),
        student_id: Set(format!("S-{id}")),
        email: Set("student@example.edu".to_string()),
        exam_name: Set("Algorithms Final".to_string()),
        exam_date: Set(chrono::Utc::now().date_naive()),
        complaint_type: Set("grading".to_string()),
        description: Set("Question three was marked incorrectly.".to_string()),
        desired_resolution: Set("Remark the paper".to_string()),
        status: Set(ComplaintStatus::Pending),
        course: Set(Some("CS101".to_string())),
        department: Set(Some("Computer Science".to_string())),
        faculty: Set(Some("Science".to_string())),
        created_at: Set(chrono::Utc::now().into()),
        ..Default::default()
    }
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_status_transition_records_history() {
    let db = TestDatabase::create_unique().await.expect("Failed to connect");
    examdesk_db::migrate(db.connection()).await.expect("migrations");

    // `DatabaseConnection` is not `Clone` when the `mock` feature is enabled
    // (required by the crate's unit tests), so open a second handle to the same
    // database for the repositories instead of cloning.
    let conn = Arc::new(
        sea_orm::Database::connect(db.config.database_url())
            .await
            .unwrap(),
    );
    let users = UserRepository::new(Arc::clone(&conn));
    let complaints = ComplaintRepository::new(Arc::clone(&conn));
    let history = StatusHistoryRepository::new(Arc::clone(&conn));

    users.create(test_user("stu1", "stu1@example.edu", UserRole::Student)).await.unwrap();
    users.create(test_user("adm1", "adm1@example.edu", UserRole::Admin)).await.unwrap();
    complaints.create(test_complaint("c1", "stu1")).await.unwrap();

    let (updated, entry) = complaints
        .update_status_recorded(
            "c1",
            ComplaintStatus::Resolved,
            "h1".to_string(),
            "adm1",
            "Test Admin",
            Some("fixed".to_string()),
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(updated.status, ComplaintStatus::Resolved);
    assert_eq!(entry.old_status, Some(ComplaintStatus::Pending));

    let log = history.list_for_complaint("c1").await.unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].notes.as_deref(), Some("fixed"));

    db.drop_database().await.unwrap();
}

#[tokio::test]
#[ignore = "requires running PostgreSQL instance"]
async fn test_status_transition_is_atomic() {
    let db = TestDatabase::create_unique().await.expect("Failed to connect");
    examdesk_db::migrate(db.connection()).await.expect("migrations");

    // `DatabaseConnection` is not `Clone` when the `mock` feature is enabled
    // (required by the crate's unit tests), so open a second handle to the same
    // database for the repositories instead of cloning.
    let conn = Arc::new(
        sea_orm::Database::connect(db.config.database_url())
            .await
            .unwrap(),
    );
    let users = UserRepository::new(Arc::clone(&conn));
    let complaints = ComplaintRepository::new(Arc::clone(&conn));

    users.create(test_user("stu1", "stu1@example.edu", UserRole::Student)).await.unwrap();
    users.create(test_user("adm1", "adm1@example.edu", UserRole::Admin)).await.unwrap();
    complaints.create(test_complaint("c1", "stu1")).await.unwrap();

    // Seed one transition so the history id "dup" is taken.
    complaints
        .update_status_recorded(
            "c1",
            ComplaintStatus::UnderReview,
            "dup".to_string(),
            "adm1",
            "Test Admin",
            None,
        )
        .await
        .unwrap()
        .unwrap();

    // Force the history append to fail with a duplicate primary key. The
    // status write in the same transaction must roll back with it.
    let result = complaints
        .update_status_recorded(
            "c1",
            ComplaintStatus::Resolved,
            "dup".to_string(),
            "adm1",
            "Test Admin",
            None,
        )
        .await;
    assert!(result.is_err());

    let after = complaints
        .find_by_id_scoped("c1", sea_orm::Condition::all())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.status, ComplaintStatus::UnderReview);

    db.drop_database().await.unwrap();
}
