//! Create `users` table.
//!
//! Email is the lookup key and carries the unique constraint that makes
//! registration "create if unique" in a single insert.
use sea_orm_migration::{prelude::*, schema::*, sea_orm::DatabaseBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // sqlite only auto-increments an INTEGER primary key, which is 64-bit there anyway.
        let mut id = match manager.get_database_backend() {
            DatabaseBackend::Sqlite => integer(Users::Id),
            _ => big_integer(Users::Id),
        };
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(id.auto_increment().primary_key())
                    .col(string_len(Users::Email, 255).unique_key().not_null())
                    .col(text(Users::PassHash).not_null())
                    .col(boolean(Users::IsAdmin).not_null().default(false))
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, Email, PassHash, IsAdmin, CreatedAt }
