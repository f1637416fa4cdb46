use database::SoftDelete;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::models::{Dish, DishType};
use crate::events::EventBuffer;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dishes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub dish_type: DishType,
    pub picture_url: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub add_on_price: Option<Decimal>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::restaurants::entity::Entity",
        from = "Column::RestaurantId",
        to = "crate::restaurants::entity::Column::Id"
    )]
    Restaurant,
}

impl Related<crate::restaurants::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDelete for Entity {
    fn id_column() -> Column {
        Column::Id
    }

    fn deleted_at_column() -> Column {
        Column::DeletedAt
    }
}

impl From<Model> for Dish {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            name: model.name,
            dish_type: model.dish_type,
            picture_url: model.picture_url,
            add_on_price: model.add_on_price,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            deleted_at: model.deleted_at.map(Into::into),
            events: EventBuffer::default(),
        }
    }
}

impl From<&Dish> for ActiveModel {
    fn from(dish: &Dish) -> Self {
        ActiveModel {
            id: Set(dish.id),
            restaurant_id: Set(dish.restaurant_id),
            name: Set(dish.name.clone()),
            dish_type: Set(dish.dish_type),
            picture_url: Set(dish.picture_url.clone()),
            add_on_price: Set(dish.add_on_price),
            created_at: Set(dish.created_at.into()),
            updated_at: Set(dish.updated_at.into()),
            deleted_at: Set(dish.deleted_at.map(Into::into)),
        }
    }
}
