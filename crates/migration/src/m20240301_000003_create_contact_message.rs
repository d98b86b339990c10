//! Create `contact_message` table.
//!
//! Messages submitted through the public contact form.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactMessage::Table)
                    .if_not_exists()
                    .col(uuid(ContactMessage::Id).primary_key())
                    .col(string_len(ContactMessage::Name, 128).not_null())
                    .col(string_len(ContactMessage::Email, 255).not_null())
                    .col(ColumnDef::new(ContactMessage::Phone).string_len(32).null())
                    .col(ColumnDef::new(ContactMessage::Subject).string_len(200).null())
                    .col(text(ContactMessage::Message).not_null())
                    .col(string_len(ContactMessage::Status, 16).not_null())
                    .col(timestamp_with_time_zone(ContactMessage::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ContactMessage::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ContactMessage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ContactMessage { Table, Id, Name, Email, Phone, Subject, Message, Status, CreatedAt, UpdatedAt }
