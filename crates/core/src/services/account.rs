//! Account service.
//!
//! Registration, credential checks, profile updates, and password changes.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use examdesk_common::{AppError, AppResult, IdGenerator};
use examdesk_db::{
    entities::user::{self, AdminPosition, UserRole},
    repositories::UserRepository,
};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

use crate::session::SessionActor;

/// Input for registering a student.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStudentInput {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(min = 1, max = 50))]
    pub student_id: String,

    #[validate(length(min = 1, max = 255))]
    pub department: String,

    #[validate(length(min = 1, max = 255))]
    pub faculty: String,

    #[validate(length(min = 1, max = 50))]
    pub level: String,
}

/// Input for registering an admin.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminInput {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255))]
    pub last_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 50))]
    pub staff_id: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    pub position: AdminPosition,

    #[validate(length(max = 255))]
    pub department: Option<String>,

    #[validate(length(max = 255))]
    pub faculty: Option<String>,

    /// Comma-separated course codes (lecturers).
    pub courses: Option<String>,
}

/// Input for updating a profile.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    #[validate(length(min = 1, max = 255))]
    pub first_name: Option<String>,

    #[validate(length(min = 1, max = 255))]
    pub last_name: Option<String>,

    #[validate(length(max = 20))]
    pub phone: Option<String>,

    #[validate(length(max = 255))]
    pub department: Option<String>,

    #[validate(length(max = 255))]
    pub faculty: Option<String>,

    pub courses: Option<String>,
}

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new student account.
    pub async fn register_student(&self, input: RegisterStudentInput) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_email_or_student_id(&input.email, &input.student_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "Email or student ID already registered".to_string(),
            ));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)?),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            student_id: Set(Some(input.student_id)),
            staff_id: Set(None),
            role: Set(UserRole::Student),
            level: Set(Some(input.level)),
            position: Set(None),
            phone: Set(None),
            department: Set(Some(input.department)),
            faculty: Set(Some(input.faculty)),
            courses: Set(None),
            profile_pic_url: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            password_updated_at: Set(None),
        };

        self.user_repo.create(model).await
    }

    /// Register a new admin account.
    pub async fn register_admin(&self, input: RegisterAdminInput) -> AppResult<user::Model> {
        input.validate()?;

        if self
            .user_repo
            .find_by_email_and_role(&input.email, UserRole::Admin)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "An admin with this email already exists".to_string(),
            ));
        }

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            email: Set(input.email),
            password_hash: Set(hash_password(&input.password)?),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            student_id: Set(None),
            staff_id: Set(Some(input.staff_id)),
            role: Set(UserRole::Admin),
            level: Set(None),
            position: Set(Some(input.position)),
            phone: Set(None),
            department: Set(input.department),
            faculty: Set(input.faculty),
            courses: Set(input.courses),
            profile_pic_url: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            password_updated_at: Set(None),
        };

        self.user_repo.create(model).await
    }

    /// Authenticate by email, password, and role.
    ///
    /// Wrong email, wrong role, and wrong password are indistinguishable
    /// to the caller.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_email_and_role(email, role)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Re-read the session actor's user row, verifying id and role still
    /// match.
    pub async fn current_user(&self, actor: &SessionActor) -> AppResult<user::Model> {
        let role = match actor.role.as_str() {
            "student" => UserRole::Student,
            "admin" => UserRole::Admin,
            _ => return Err(AppError::Unauthorized),
        };

        self.user_repo
            .find_by_id_and_role(&actor.user_id, role)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Update profile fields. Role and scope-granting fields of students
    /// are untouched by design of the input type.
    pub async fn update_profile(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<user::Model> {
        input.validate()?;

        let current = self.user_repo.get_by_id(user_id).await?;

        let mut model: user::ActiveModel = current.into();
        if let Some(first_name) = input.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = input.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(phone) = input.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(department) = input.department {
            model.department = Set(Some(department));
        }
        if let Some(faculty) = input.faculty {
            model.faculty = Set(Some(faculty));
        }
        if let Some(courses) = input.courses {
            model.courses = Set(Some(courses));
        }
        model.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(model).await
    }

    /// Change a password after verifying the current one.
    pub async fn change_password(
        &self,
        user_id: &str,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<()> {
        if new_password.len() < 8 {
            return Err(AppError::Validation(
                "password: must be at least 8 characters".to_string(),
            ));
        }

        let user = self.user_repo.get_by_id(user_id).await?;

        if !verify_password(current_password, &user.password_hash) {
            return Err(AppError::Unauthorized);
        }

        self.user_repo
            .update_password(user_id, hash_password(new_password)?)
            .await
    }
}

/// Hash a password with Argon2 into PHC string format.
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored PHC hash.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn service_with(db: sea_orm::DatabaseConnection) -> AccountService {
        AccountService::new(UserRepository::new(Arc::new(db)))
    }

    fn stored_user(password: &str, role: UserRole) -> user::Model {
        user::Model {
            id: "u1".to_string(),
            email: "ada@example.edu".to_string(),
            password_hash: hash_password(password).unwrap(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            student_id: Some("S0001".to_string()),
            staff_id: None,
            role,
            level: Some("300".to_string()),
            position: None,
            phone: None,
            department: Some("Computer Science".to_string()),
            faculty: Some("Science".to_string()),
            courses: None,
            profile_pic_url: None,
            created_at: Utc::now().into(),
            updated_at: None,
            password_updated_at: None,
        }
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_password_bad_hash_is_false() {
        assert!(!verify_password("anything", "not-a-phc-hash"));
    }

    #[tokio::test]
    async fn test_register_student_duplicate_is_conflict() {
        let existing = stored_user("hunter22222", UserRole::Student);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[existing]])
            .into_connection();

        let service = service_with(db);
        let result = service
            .register_student(RegisterStudentInput {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: "ada@example.edu".to_string(),
                password: "hunter22222".to_string(),
                student_id: "S0001".to_string(),
                department: "Computer Science".to_string(),
                faculty: "Science".to_string(),
                level: "300".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_unauthorized() {
        let user = stored_user("right-password", UserRole::Student);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[user]])
            .into_connection();

        let service = service_with(db);
        let result = service
            .login("ada@example.edu", "wrong-password", UserRole::Student)
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_unauthorized() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<user::Model>::new()])
            .into_connection();

        let service = service_with(db);
        let result = service
            .login("nobody@example.edu", "whatever1", UserRole::Student)
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_change_password_rejects_short_replacement() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = service_with(db);

        let result = service.change_password("u1", "current-pass", "short").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
