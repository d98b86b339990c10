use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Gallery pages read artworks of one artist in position order
        manager
            .create_index(
                Index::create()
                    .name("idx_artwork_artist_position")
                    .table(Artwork::Table)
                    .col(Artwork::ArtistId)
                    .col(Artwork::Position)
                    .to_owned(),
            )
            .await?;

        // Inbox polling: replies of a thread newer than a timestamp
        manager
            .create_index(
                Index::create()
                    .name("idx_contact_reply_thread")
                    .table(ContactReply::Table)
                    .col(ContactReply::ContactId)
                    .col(ContactReply::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_contact_status")
                    .table(ContactMessage::Table)
                    .col(ContactMessage::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_comment_post_status")
                    .table(Comment::Table)
                    .col(Comment::PostId)
                    .col(Comment::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_blog_post_published")
                    .table(BlogPost::Table)
                    .col(BlogPost::Published)
                    .col(BlogPost::PublishedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_meeting_start")
                    .table(Meeting::Table)
                    .col(Meeting::StartTime)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_meeting_start").table(Meeting::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_blog_post_published").table(BlogPost::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_comment_post_status").table(Comment::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_contact_status").table(ContactMessage::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_contact_reply_thread").table(ContactReply::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_artwork_artist_position").table(Artwork::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Artwork { Table, ArtistId, Position }

#[derive(DeriveIden)]
enum ContactReply { Table, ContactId, CreatedAt }

#[derive(DeriveIden)]
enum ContactMessage { Table, Status }

#[derive(DeriveIden)]
enum Comment { Table, PostId, Status }

#[derive(DeriveIden)]
enum BlogPost { Table, Published, PublishedAt }

#[derive(DeriveIden)]
enum Meeting { Table, StartTime }
