use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261014_000001_create_restaurants::Restaurants;
use crate::m20261014_000002_create_categories::Categories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_uuid(Products::Id))
                    .col(uuid(Products::RestaurantId))
                    .col(uuid(Products::CategoryId))
                    .col(string(Products::Name))
                    .col(text(Products::Description).default(""))
                    .col(decimal_len(Products::SalesPrice, 12, 2))
                    .col(decimal_len(Products::CostPrice, 12, 2))
                    .col(string_null(Products::PictureUrl))
                    .col(json_binary(Products::DishTypeMap).default("{}"))
                    .col(boolean(Products::Active).default(true))
                    .col(
                        timestamp_with_time_zone(Products::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Products::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Products::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_restaurant")
                            .from(Products::Table, Products::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_category")
                            .from(Products::Table, Products::CategoryId)
                            .to(Categories::Table, Categories::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_category_id")
                    .table(Products::Table)
                    .col(Products::CategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_products_restaurant_name ON products (restaurant_id, name) WHERE deleted_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    RestaurantId,
    CategoryId,
    Name,
    Description,
    SalesPrice,
    CostPrice,
    PictureUrl,
    DishTypeMap,
    Active,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}
