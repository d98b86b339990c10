//! Create `service_offering` table: services listed on the marketing site.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceOffering::Table)
                    .if_not_exists()
                    .col(uuid(ServiceOffering::Id).primary_key())
                    .col(string_len(ServiceOffering::Title, 128).not_null())
                    .col(string_len(ServiceOffering::Slug, 96).unique_key().not_null())
                    .col(text(ServiceOffering::Summary).not_null())
                    .col(text(ServiceOffering::Description).not_null())
                    .col(ColumnDef::new(ServiceOffering::Icon).string_len(64).null())
                    .col(ColumnDef::new(ServiceOffering::PriceFrom).integer().null())
                    .col(integer(ServiceOffering::Position).not_null())
                    .col(boolean(ServiceOffering::Active).not_null())
                    .col(timestamp_with_time_zone(ServiceOffering::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceOffering::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceOffering::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceOffering {
    Table,
    Id,
    Title,
    Slug,
    Summary,
    Description,
    Icon,
    PriceFrom,
    Position,
    Active,
    CreatedAt,
    UpdatedAt,
}
