use database::SoftDelete;
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::models::Category;
use crate::events::EventBuffer;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub name: String,
    pub picture_url: Option<String>,
    pub priority: i32,
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

impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            restaurant_id: model.restaurant_id,
            name: model.name,
            picture_url: model.picture_url,
            priority: model.priority,
            active: model.active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            deleted_at: model.deleted_at.map(Into::into),
            events: EventBuffer::default(),
        }
    }
}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        ActiveModel {
            id: Set(category.id),
            restaurant_id: Set(category.restaurant_id),
            name: Set(category.name.clone()),
            picture_url: Set(category.picture_url.clone()),
            priority: Set(category.priority),
            active: Set(category.active),
            created_at: Set(category.created_at.into()),
            updated_at: Set(category.updated_at.into()),
            deleted_at: Set(category.deleted_at.map(Into::into)),
        }
    }
}
