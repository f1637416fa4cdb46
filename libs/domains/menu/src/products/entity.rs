use database::{DatabaseError, SoftDelete};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::models::Product;
use crate::events::EventBuffer;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub sales_price: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub cost_price: Decimal,
    pub picture_url: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub dish_type_map: Json,
    pub active: bool,
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
    #[sea_orm(
        belongs_to = "crate::categories::entity::Entity",
        from = "Column::CategoryId",
        to = "crate::categories::entity::Column::Id"
    )]
    Category,
}

impl Related<crate::restaurants::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurant.def()
    }
}

impl Related<crate::categories::entity::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
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

impl TryFrom<Model> for Product {
    type Error = DatabaseError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            sales_price: model.sales_price,
            cost_price: model.cost_price,
            picture_url: model.picture_url,
            dish_type_map: serde_json::from_value(model.dish_type_map)?,
            active: model.active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            deleted_at: model.deleted_at.map(Into::into),
            events: EventBuffer::default(),
        })
    }
}

impl TryFrom<&Product> for ActiveModel {
    type Error = DatabaseError;

    fn try_from(product: &Product) -> Result<Self, Self::Error> {
        Ok(ActiveModel {
            id: Set(product.id),
            restaurant_id: Set(product.restaurant_id),
            category_id: Set(product.category_id),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            sales_price: Set(product.sales_price),
            cost_price: Set(product.cost_price),
            picture_url: Set(product.picture_url.clone()),
            dish_type_map: Set(serde_json::to_value(&product.dish_type_map)?),
            active: Set(product.active),
            created_at: Set(product.created_at.into()),
            updated_at: Set(product.updated_at.into()),
            deleted_at: Set(product.deleted_at.map(Into::into)),
        })
    }
}
