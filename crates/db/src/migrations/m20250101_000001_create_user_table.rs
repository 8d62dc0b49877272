//! Create user table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(User::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(User::Email)
                            .string_len(255)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(User::PasswordHash).string_len(255).not_null())
                    .col(ColumnDef::new(User::FirstName).string_len(255).not_null())
                    .col(ColumnDef::new(User::LastName).string_len(255).not_null())
                    .col(ColumnDef::new(User::StudentId).string_len(50).unique_key())
                    .col(ColumnDef::new(User::StaffId).string_len(50).unique_key())
                    .col(ColumnDef::new(User::Role).string_len(32).not_null())
                    .col(ColumnDef::new(User::Level).string_len(50))
                    .col(ColumnDef::new(User::Position).string_len(64))
                    .col(ColumnDef::new(User::Phone).string_len(20))
                    .col(ColumnDef::new(User::Department).string_len(255))
                    .col(ColumnDef::new(User::Faculty).string_len(255))
                    .col(ColumnDef::new(User::Courses).text())
                    .col(ColumnDef::new(User::ProfilePicUrl).string_len(512))
                    .col(
                        ColumnDef::new(User::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(User::UpdatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(User::PasswordUpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: role (for admin listing and stats counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_user_role")
                    .table(User::Table)
                    .col(User::Role)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum User {
    Table,
    Id,
    Email,
    PasswordHash,
    FirstName,
    LastName,
    StudentId,
    StaffId,
    Role,
    Level,
    Position,
    Phone,
    Department,
    Faculty,
    Courses,
    ProfilePicUrl,
    CreatedAt,
    UpdatedAt,
    PasswordUpdatedAt,
}
