//! User repository.

use std::sync::Arc;

use crate::entities::{User, user};
use crate::map_db_err;
use crate::retry::RetryPolicy;
use examdesk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QuerySelect, Set,
};

/// User repository for database operations.
#[derive(Clone)]
pub struct UserRepository {
    db: Arc<DatabaseConnection>,
    retry: RetryPolicy,
}

impl UserRepository {
    /// Create a new user repository.
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

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<user::Model>> {
        self.retry
            .run_read(|| User::find_by_id(id).one(self.db.as_ref()))
            .await
            .map_err(map_db_err)
    }

    /// Get a user by ID, failing when absent.
    pub async fn get_by_id(&self, id: &str) -> AppResult<user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user {id}")))
    }

    /// Find a user by ID and role.
    pub async fn find_by_id_and_role(
        &self,
        id: &str,
        role: user::UserRole,
    ) -> AppResult<Option<user::Model>> {
        self.retry
            .run_read(|| {
                User::find_by_id(id)
                    .filter(user::Column::Role.eq(role.clone()))
                    .one(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Find a user by email.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<user::Model>> {
        self.retry
            .run_read(|| {
                User::find()
                    .filter(user::Column::Email.eq(email))
                    .one(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Find a user by email and role.
    pub async fn find_by_email_and_role(
        &self,
        email: &str,
        role: user::UserRole,
    ) -> AppResult<Option<user::Model>> {
        self.retry
            .run_read(|| {
                User::find()
                    .filter(user::Column::Email.eq(email))
                    .filter(user::Column::Role.eq(role.clone()))
                    .one(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Find a user matching either email or student ID (duplicate check).
    pub async fn find_by_email_or_student_id(
        &self,
        email: &str,
        student_id: &str,
    ) -> AppResult<Option<user::Model>> {
        self.retry
            .run_read(|| {
                User::find()
                    .filter(
                        Condition::any()
                            .add(user::Column::Email.eq(email))
                            .add(user::Column::StudentId.eq(student_id)),
                    )
                    .one(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// Create a new user.
    pub async fn create(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.insert(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a user.
    pub async fn update(&self, model: user::ActiveModel) -> AppResult<user::Model> {
        model.update(self.db.as_ref()).await.map_err(map_db_err)
    }

    /// Update a user's password hash.
    pub async fn update_password(&self, id: &str, password_hash: String) -> AppResult<()> {
        let now = chrono::Utc::now();
        let model = user::ActiveModel {
            id: Set(id.to_string()),
            password_hash: Set(password_hash),
            password_updated_at: Set(Some(now.into())),
            updated_at: Set(Some(now.into())),
            ..Default::default()
        };
        model.update(self.db.as_ref()).await.map_err(map_db_err)?;
        Ok(())
    }

    /// Count users holding a role.
    pub async fn count_by_role(&self, role: user::UserRole) -> AppResult<u64> {
        self.retry
            .run_read(|| {
                User::find()
                    .filter(user::Column::Role.eq(role.clone()))
                    .count(self.db.as_ref())
            })
            .await
            .map_err(map_db_err)
    }

    /// List the IDs of all users holding a role.
    pub async fn list_ids_by_role(&self, role: user::UserRole) -> AppResult<Vec<String>> {
        self.retry
            .run_read(|| {
                User::find()
                    .filter(user::Column::Role.eq(role.clone()))
                    .select_only()
                    .column(user::Column::Id)
                    .into_tuple::<String>()
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
    use crate::entities::user::UserRole;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_user(id: &str, email: &str, role: UserRole) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$test".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            student_id: None,
            staff_id: None,
            role,
            level: None,
            position: None,
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

    #[tokio::test]
    async fn test_find_by_id_found() {
        let user = create_test_user("u1", "ada@example.edu", UserRole::Student);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user.clone()]])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.find_by_id("u1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().email, "ada@example.edu");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );

        let repo = UserRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_full_name() {
        let user = create_test_user("u1", "ada@example.edu", UserRole::Admin);
        assert_eq!(user.full_name(), "Ada Lovelace");
    }
}
