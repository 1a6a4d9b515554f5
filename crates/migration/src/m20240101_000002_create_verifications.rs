//! Create `verifications` table with FK to `users`.
//!
//! `user_id` is unique: a user owns at most one pending verification.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Verifications::Table)
                    .if_not_exists()
                    .col(uuid(Verifications::Id).primary_key())
                    .col(uuid(Verifications::Secret).not_null())
                    .col(uuid(Verifications::UserId).unique_key().not_null())
                    .col(timestamp_with_time_zone(Verifications::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Verifications::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_verifications_user")
                            .from(Verifications::Table, Verifications::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Verifications::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Verifications {
    Table,
    Id,
    Secret,
    UserId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
