//! Status history entity.
//!
//! Append-only audit log of complaint status transitions: exactly one row
//! per transition, never mutated or deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::complaint::ComplaintStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "status_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub complaint_id: String,

    /// NULL for rows recorded before history tracking existed.
    #[sea_orm(nullable)]
    pub old_status: Option<ComplaintStatus>,

    pub new_status: ComplaintStatus,

    /// The admin who applied the transition.
    pub changed_by: String,

    /// Denormalized display name of the admin at transition time.
    pub changed_by_name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::complaint::Entity",
        from = "Column::ComplaintId",
        to = "super::complaint::Column::Id",
        on_delete = "Cascade"
    )]
    Complaint,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ChangedBy",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    ChangedByUser,
}

impl Related<super::complaint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Complaint.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
