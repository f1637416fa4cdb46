use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261014_000001_create_restaurants::Restaurants;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_uuid(Categories::Id))
                    .col(uuid(Categories::RestaurantId))
                    .col(string(Categories::Name))
                    .col(string_null(Categories::PictureUrl))
                    .col(integer(Categories::Priority).default(0))
                    .col(boolean(Categories::Active).default(true))
                    .col(
                        timestamp_with_time_zone(Categories::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Categories::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Categories::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_restaurant")
                            .from(Categories::Table, Categories::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_categories_restaurant_priority")
                    .table(Categories::Table)
                    .col(Categories::RestaurantId)
                    .col(Categories::Priority)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_categories_restaurant_name ON categories (restaurant_id, name) WHERE deleted_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Categories {
    Table,
    Id,
    RestaurantId,
    Name,
    PictureUrl,
    Priority,
    Active,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
