//! Create `meeting` table.
//!
//! Meetings scheduled from the back office; `artist_id` is nulled when the
//! artist is removed so meeting history survives.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meeting::Table)
                    .if_not_exists()
                    .col(uuid(Meeting::Id).primary_key())
                    .col(string_len(Meeting::Title, 200).not_null())
                    .col(text(Meeting::Description).not_null())
                    .col(string_len(Meeting::AttendeeName, 128).not_null())
                    .col(string_len(Meeting::AttendeeEmail, 255).not_null())
                    .col(ColumnDef::new(Meeting::ArtistId).uuid().null())
                    .col(timestamp_with_time_zone(Meeting::StartTime).not_null())
                    .col(integer(Meeting::DurationMinutes).not_null())
                    .col(string_len(Meeting::Timezone, 64).not_null())
                    .col(ColumnDef::new(Meeting::MeetingLink).string_len(512).null())
                    .col(ColumnDef::new(Meeting::CalendarEventId).string_len(255).null())
                    .col(string_len(Meeting::Status, 16).not_null())
                    .col(timestamp_with_time_zone(Meeting::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Meeting::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_meeting_artist")
                            .from(Meeting::Table, Meeting::ArtistId)
                            .to(Artist::Table, Artist::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Meeting::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Meeting {
    Table,
    Id,
    Title,
    Description,
    AttendeeName,
    AttendeeEmail,
    ArtistId,
    StartTime,
    DurationMinutes,
    Timezone,
    MeetingLink,
    CalendarEventId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Artist { Table, Id }
