//! Create `feedback` table. Approved rows are published as testimonials.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(uuid(Feedback::Id).primary_key())
                    .col(string_len(Feedback::Name, 128).not_null())
                    .col(ColumnDef::new(Feedback::Email).string_len(255).null())
                    .col(integer(Feedback::Rating).not_null())
                    .col(text(Feedback::Message).not_null())
                    .col(boolean(Feedback::Approved).not_null())
                    .col(timestamp_with_time_zone(Feedback::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Feedback::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Feedback { Table, Id, Name, Email, Rating, Message, Approved, CreatedAt }
