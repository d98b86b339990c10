//! Create `contact_reply` table: follow-up messages of a contact thread.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContactReply::Table)
                    .if_not_exists()
                    .col(uuid(ContactReply::Id).primary_key())
                    .col(uuid(ContactReply::ContactId).not_null())
                    .col(string_len(ContactReply::Author, 16).not_null())
                    .col(text(ContactReply::Body).not_null())
                    .col(timestamp_with_time_zone(ContactReply::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_contact_reply_contact")
                            .from(ContactReply::Table, ContactReply::ContactId)
                            .to(ContactMessage::Table, ContactMessage::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ContactReply::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ContactReply { Table, Id, ContactId, Author, Body, CreatedAt }

#[derive(DeriveIden)]
enum ContactMessage { Table, Id }
