//! Complaint entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Complaint lifecycle states.
///
/// `pending` is the initial state. Transitions are admin-triggered and
/// deliberately unconstrained: any state may be set to any state,
/// including re-opening a resolved complaint.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "under-review")]
    UnderReview,
    #[sea_orm(string_value = "resolved")]
    Resolved,
}

impl ComplaintStatus {
    /// The wire/database representation of this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::UnderReview => "under-review",
            Self::Resolved => "resolved",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "complaint")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Human-readable reference shown to the student, e.g. "REF-483920".
    #[sea_orm(unique)]
    pub reference_number: String,

    /// The submitting student.
    pub user_id: String,

    pub full_name: String,

    pub student_id: String,

    pub email: String,

    #[sea_orm(nullable)]
    pub phone: Option<String>,

    pub exam_name: String,

    pub exam_date: Date,

    pub complaint_type: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    #[sea_orm(column_type = "Text")]
    pub desired_resolution: String,

    /// Link to uploaded evidence, stored externally.
    #[sea_orm(nullable)]
    pub evidence_url: Option<String>,

    pub status: ComplaintStatus,

    /// Course code the exam belongs to; drives lecturer-scoped visibility.
    #[sea_orm(nullable)]
    pub course: Option<String>,

    /// Department owning the exam; drives HOD-scoped visibility.
    #[sea_orm(nullable)]
    pub department: Option<String>,

    /// Faculty owning the exam; drives dean-scoped visibility.
    #[sea_orm(nullable)]
    pub faculty: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    Owner,

    #[sea_orm(has_many = "super::response::Entity")]
    Responses,

    #[sea_orm(has_many = "super::status_history::Entity")]
    StatusHistory,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl Related<super::status_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StatusHistory.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
