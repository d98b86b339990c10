//! Create `artist` table.
//!
//! Portfolio owners; slug and email are unique.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artist::Table)
                    .if_not_exists()
                    .col(uuid(Artist::Id).primary_key())
                    .col(string_len(Artist::Name, 128).not_null())
                    .col(string_len(Artist::Slug, 96).unique_key().not_null())
                    .col(string_len(Artist::Email, 255).unique_key().not_null())
                    .col(string_len(Artist::Discipline, 64).not_null())
                    .col(text(Artist::Bio).not_null())
                    .col(ColumnDef::new(Artist::AvatarUrl).string_len(512).null())
                    .col(ColumnDef::new(Artist::Website).string_len(512).null())
                    .col(json_binary(Artist::SocialLinks).not_null())
                    .col(boolean(Artist::Featured).not_null())
                    .col(boolean(Artist::Active).not_null())
                    .col(timestamp_with_time_zone(Artist::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Artist::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Artist::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Artist {
    Table,
    Id,
    Name,
    Slug,
    Email,
    Discipline,
    Bio,
    AvatarUrl,
    Website,
    SocialLinks,
    Featured,
    Active,
    CreatedAt,
    UpdatedAt,
}
