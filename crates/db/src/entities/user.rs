//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account roles.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[sea_orm(string_value = "student")]
    Student,
    #[sea_orm(string_value = "admin")]
    Admin,
}

impl UserRole {
    /// The wire/database representation of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

/// Organizational positions an admin may hold.
///
/// The position decides which complaints the admin may see: lecturers are
/// scoped to their courses, heads of department to their department, deans
/// to their faculty, and system administrators see everything.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(64))")]
#[serde(rename_all = "kebab-case")]
pub enum AdminPosition {
    #[sea_orm(string_value = "lecturer")]
    Lecturer,
    #[sea_orm(string_value = "hod")]
    Hod,
    #[sea_orm(string_value = "dean")]
    Dean,
    #[sea_orm(string_value = "system-administrator")]
    SystemAdministrator,
}

impl AdminPosition {
    /// The wire/database representation of this position.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lecturer => "lecturer",
            Self::Hod => "hod",
            Self::Dean => "dean",
            Self::SystemAdministrator => "system-administrator",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub email: String,

    /// Argon2 PHC-format password hash.
    pub password_hash: String,

    pub first_name: String,

    pub last_name: String,

    /// Student matriculation number (students only).
    #[sea_orm(unique, nullable)]
    pub student_id: Option<String>,

    /// Staff number (admins only).
    #[sea_orm(unique, nullable)]
    pub staff_id: Option<String>,

    pub role: UserRole,

    /// Study level, e.g. "300" (students only).
    #[sea_orm(nullable)]
    pub level: Option<String>,

    /// Organizational position (admins only).
    #[sea_orm(nullable)]
    pub position: Option<AdminPosition>,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    #[sea_orm(nullable)]
    pub department: Option<String>,

    #[sea_orm(nullable)]
    pub faculty: Option<String>,

    /// Comma-separated course codes (lecturers only).
    #[sea_orm(column_type = "Text", nullable)]
    pub courses: Option<String>,

    #[sea_orm(nullable)]
    pub profile_pic_url: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,

    #[sea_orm(nullable)]
    pub password_updated_at: Option<DateTimeWithTimeZone>,
}

impl Model {
    /// Display name used for denormalized author/actor columns.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::complaint::Entity")]
    Complaints,

    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::complaint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Complaints.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
