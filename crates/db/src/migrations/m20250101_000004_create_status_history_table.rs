//! Create status history table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StatusHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StatusHistory::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StatusHistory::ComplaintId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(StatusHistory::OldStatus).string_len(32))
                    .col(
                        ColumnDef::new(StatusHistory::NewStatus)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StatusHistory::ChangedBy)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StatusHistory::ChangedByName)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(StatusHistory::Notes).text())
                    .col(
                        ColumnDef::new(StatusHistory::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_history_complaint")
                            .from(StatusHistory::Table, StatusHistory::ComplaintId)
                            .to(Complaint::Table, Complaint::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_status_history_changed_by")
                            .from(StatusHistory::Table, StatusHistory::ChangedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: (complaint_id, created_at) (for the newest-first history view)
        manager
            .create_index(
                Index::create()
                    .name("idx_status_history_complaint_created")
                    .table(StatusHistory::Table)
                    .col(StatusHistory::ComplaintId)
                    .col(StatusHistory::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StatusHistory::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum StatusHistory {
    Table,
    Id,
    ComplaintId,
    OldStatus,
    NewStatus,
    ChangedBy,
    ChangedByName,
    Notes,
    CreatedAt,
}

#[derive(Iden)]
enum Complaint {
    Table,
    Id,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}
