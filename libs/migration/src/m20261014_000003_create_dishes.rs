use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20261014_000001_create_restaurants::Restaurants;

#[derive(DeriveMigrationName)]
pub struct Migration;

const DISH_TYPES: [DishType; 7] = [
    DishType::Meat,
    DishType::Accompaniment,
    DishType::SideDish,
    DishType::Dessert,
    DishType::Drink,
    DishType::Salad,
    DishType::Other,
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(DishType::Enum)
                    .values(DISH_TYPES)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Dishes::Table)
                    .if_not_exists()
                    .col(pk_uuid(Dishes::Id))
                    .col(uuid(Dishes::RestaurantId))
                    .col(string(Dishes::Name))
                    .col(
                        ColumnDef::new(Dishes::DishType)
                            .enumeration(DishType::Enum, DISH_TYPES)
                            .not_null(),
                    )
                    .col(string_null(Dishes::PictureUrl))
                    .col(decimal_len_null(Dishes::AddOnPrice, 12, 2))
                    .col(
                        timestamp_with_time_zone(Dishes::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Dishes::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(timestamp_with_time_zone_null(Dishes::DeletedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dishes_restaurant")
                            .from(Dishes::Table, Dishes::RestaurantId)
                            .to(Restaurants::Table, Restaurants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS uq_dishes_restaurant_name ON dishes (restaurant_id, name) WHERE deleted_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dishes::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(DishType::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Dishes {
    Table,
    Id,
    RestaurantId,
    Name,
    DishType,
    PictureUrl,
    AddOnPrice,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum DishType {
    #[sea_orm(iden = "dish_type")]
    Enum,
    #[sea_orm(iden = "meat")]
    Meat,
    #[sea_orm(iden = "accompaniment")]
    Accompaniment,
    #[sea_orm(iden = "side_dish")]
    SideDish,
    #[sea_orm(iden = "dessert")]
    Dessert,
    #[sea_orm(iden = "drink")]
    Drink,
    #[sea_orm(iden = "salad")]
    Salad,
    #[sea_orm(iden = "other")]
    Other,
}
