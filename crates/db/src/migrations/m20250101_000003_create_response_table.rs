//! Create response table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Response::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Response::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Response::ComplaintId).string_len(32).not_null())
                    .col(ColumnDef::new(Response::AuthorId).string_len(32).not_null())
                    .col(ColumnDef::new(Response::AuthorName).string_len(255).not_null())
                    .col(ColumnDef::new(Response::Body).text().not_null())
                    .col(
                        ColumnDef::new(Response::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_response_complaint")
                            .from(Response::Table, Response::ComplaintId)
                            .to(Complaint::Table, Complaint::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_response_author")
                            .from(Response::Table, Response::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: complaint_id (for the per-complaint response thread)
        manager
            .create_index(
                Index::create()
                    .name("idx_response_complaint_id")
                    .table(Response::Table)
                    .col(Response::ComplaintId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Response::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Response {
    Table,
    Id,
    ComplaintId,
    AuthorId,
    AuthorName,
    Body,
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
