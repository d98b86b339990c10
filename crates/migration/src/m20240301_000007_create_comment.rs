//! Create `comment` table with FK to `blog_post`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comment::Table)
                    .if_not_exists()
                    .col(uuid(Comment::Id).primary_key())
                    .col(uuid(Comment::PostId).not_null())
                    .col(string_len(Comment::AuthorName, 128).not_null())
                    .col(string_len(Comment::AuthorEmail, 255).not_null())
                    .col(text(Comment::Body).not_null())
                    .col(string_len(Comment::Status, 16).not_null())
                    .col(timestamp_with_time_zone(Comment::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comment_post")
                            .from(Comment::Table, Comment::PostId)
                            .to(BlogPost::Table, BlogPost::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Comment::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Comment { Table, Id, PostId, AuthorName, AuthorEmail, Body, Status, CreatedAt }

#[derive(DeriveIden)]
enum BlogPost { Table, Id }
