//! Create `artwork` table with FK to `artist`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Artwork::Table)
                    .if_not_exists()
                    .col(uuid(Artwork::Id).primary_key())
                    .col(uuid(Artwork::ArtistId).not_null())
                    .col(string_len(Artwork::Title, 200).not_null())
                    .col(text(Artwork::Description).not_null())
                    .col(string_len(Artwork::ImageUrl, 512).not_null())
                    .col(integer(Artwork::Position).not_null())
                    .col(timestamp_with_time_zone(Artwork::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_artwork_artist")
                            .from(Artwork::Table, Artwork::ArtistId)
                            .to(Artist::Table, Artist::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Artwork::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Artwork { Table, Id, ArtistId, Title, Description, ImageUrl, Position, CreatedAt }

#[derive(DeriveIden)]
enum Artist { Table, Id }
