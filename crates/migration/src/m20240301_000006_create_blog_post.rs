//! Create `blog_post` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BlogPost::Table)
                    .if_not_exists()
                    .col(uuid(BlogPost::Id).primary_key())
                    .col(string_len(BlogPost::Title, 200).not_null())
                    .col(string_len(BlogPost::Slug, 96).unique_key().not_null())
                    .col(text(BlogPost::Excerpt).not_null())
                    .col(text(BlogPost::Content).not_null())
                    .col(ColumnDef::new(BlogPost::CoverImageUrl).string_len(512).null())
                    .col(string_len(BlogPost::Author, 128).not_null())
                    .col(json_binary(BlogPost::Tags).not_null())
                    .col(boolean(BlogPost::Published).not_null())
                    .col(ColumnDef::new(BlogPost::PublishedAt).timestamp_with_time_zone().null())
                    .col(timestamp_with_time_zone(BlogPost::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(BlogPost::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BlogPost::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BlogPost {
    Table,
    Id,
    Title,
    Slug,
    Excerpt,
    Content,
    CoverImageUrl,
    Author,
    Tags,
    Published,
    PublishedAt,
    CreatedAt,
    UpdatedAt,
}
