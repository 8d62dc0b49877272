//! Create complaint table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaint::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Complaint::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Complaint::ReferenceNumber)
                            .string_len(50)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Complaint::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Complaint::FullName).string_len(255).not_null())
                    .col(ColumnDef::new(Complaint::StudentId).string_len(50).not_null())
                    .col(ColumnDef::new(Complaint::Email).string_len(255).not_null())
                    .col(ColumnDef::new(Complaint::Phone).string_len(20))
                    .col(ColumnDef::new(Complaint::ExamName).string_len(255).not_null())
                    .col(ColumnDef::new(Complaint::ExamDate).date().not_null())
                    .col(
                        ColumnDef::new(Complaint::ComplaintType)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Complaint::Description).text().not_null())
                    .col(ColumnDef::new(Complaint::DesiredResolution).text().not_null())
                    .col(ColumnDef::new(Complaint::EvidenceUrl).string_len(512))
                    .col(
                        ColumnDef::new(Complaint::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Complaint::Course).string_len(255))
                    .col(ColumnDef::new(Complaint::Department).string_len(255))
                    .col(ColumnDef::new(Complaint::Faculty).string_len(255))
                    .col(
                        ColumnDef::new(Complaint::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Complaint::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaint_user")
                            .from(Complaint::Table, Complaint::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (for the student's own-complaints listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_user_id")
                    .table(Complaint::Table)
                    .col(Complaint::UserId)
                    .to_owned(),
            )
            .await?;

        // Indexes: scope attributes (for role-filtered admin listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_course")
                    .table(Complaint::Table)
                    .col(Complaint::Course)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_department")
                    .table(Complaint::Table)
                    .col(Complaint::Department)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_faculty")
                    .table(Complaint::Table)
                    .col(Complaint::Faculty)
                    .to_owned(),
            )
            .await?;

        // Index: status (for dashboard counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_status")
                    .table(Complaint::Table)
                    .col(Complaint::Status)
                    .to_owned(),
            )
            .await?;

        // Index: created_at (for ordered listings and trend queries)
        manager
            .create_index(
                Index::create()
                    .name("idx_complaint_created_at")
                    .table(Complaint::Table)
                    .col(Complaint::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaint::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Complaint {
    Table,
    Id,
    ReferenceNumber,
    UserId,
    FullName,
    StudentId,
    Email,
    Phone,
    ExamName,
    ExamDate,
    ComplaintType,
    Description,
    DesiredResolution,
    EvidenceUrl,
    Status,
    Course,
    Department,
    Faculty,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
