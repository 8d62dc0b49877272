//! Session actor payload.
//!
//! The session cookie carries this JSON payload. It is produced at login
//! and treated as trusted, already-verified input everywhere else;
//! signature/verification of the cookie itself is the transport layer's
//! job.

use examdesk_db::entities::user;
use serde::{Deserialize, Serialize};

/// The authenticated actor, as carried in the session cookie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionActor {
    /// The user's ID.
    pub user_id: String,
    /// Account role, `student` or `admin`.
    pub role: String,
    /// Admin position, when an admin holds one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Admin department scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Admin faculty scope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    /// Comma-separated course codes (lecturer scope).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub courses: Option<String>,
}

impl SessionActor {
    /// Build the session payload for a freshly authenticated user.
    #[must_use]
    pub fn from_user(user: &user::Model) -> Self {
        Self {
            user_id: user.id.clone(),
            role: user.role.as_str().to_string(),
            position: user.position.as_ref().map(|p| p.as_str().to_string()),
            department: user.department.clone(),
            faculty: user.faculty.clone(),
            courses: user.courses.clone(),
        }
    }

    /// Whether the actor holds the admin role.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }

    /// Whether the actor holds the student role.
    #[must_use]
    pub fn is_student(&self) -> bool {
        self.role == "student"
    }
}
