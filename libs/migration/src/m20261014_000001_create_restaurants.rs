use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Restaurants::Table)
                    .if_not_exists()
                    .col(pk_uuid(Restaurants::Id))
                    .col(string(Restaurants::TradeName))
                    .col(string(Restaurants::LegalName))
                    .col(string(Restaurants::TaxId))
                    .col(string(Restaurants::Phone))
                    .col(string(Restaurants::Whatsapp).default(""))
                    .col(string(Restaurants::Email))
                    .col(string(Restaurants::Slug))
                    .col(json_binary(Restaurants::Address))
                    .col(string_null(Restaurants::LogoUrl))
                    .col(string_null(Restaurants::BannerUrl))
                    .col(json_binary(Restaurants::Settings).default("{}"))
                    .col(boolean(Restaurants::Active).default(true))
                    .col(
                        timestamp_with_time_zone(Restaurants::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Restaurants::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Restaurants::DeletedAt))
                    .to_owned(),
            )
            .await?;

        // Uniqueness only binds rows that are not soft-deleted
        let db = manager.get_connection();
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_restaurants_slug ON restaurants (slug) WHERE deleted_at IS NULL",
        )
        .await?;
        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS uq_restaurants_tax_id ON restaurants (tax_id) WHERE deleted_at IS NULL",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Restaurants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Restaurants {
    Table,
    Id,
    TradeName,
    LegalName,
    TaxId,
    Phone,
    Whatsapp,
    Email,
    Slug,
    Address,
    LogoUrl,
    BannerUrl,
    Settings,
    Active,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
