use database::{DatabaseError, SoftDelete};
use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::models::Restaurant;
use crate::events::EventBuffer;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "restaurants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub trade_name: String,
    pub legal_name: String,
    pub tax_id: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    pub slug: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub address: Json,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub settings: Json,
    pub active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub deleted_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl SoftDelete for Entity {
    fn id_column() -> Column {
        Column::Id
    }

    fn deleted_at_column() -> Column {
        Column::DeletedAt
    }
}

impl TryFrom<Model> for Restaurant {
    type Error = DatabaseError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            trade_name: model.trade_name,
            legal_name: model.legal_name,
            tax_id: model.tax_id,
            phone: model.phone,
            whatsapp: model.whatsapp,
            email: model.email,
            slug: model.slug,
            address: serde_json::from_value(model.address)?,
            logo_url: model.logo_url,
            banner_url: model.banner_url,
            settings: serde_json::from_value(model.settings)?,
            active: model.active,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
            deleted_at: model.deleted_at.map(Into::into),
            events: EventBuffer::default(),
        })
    }
}

impl TryFrom<&Restaurant> for ActiveModel {
    type Error = DatabaseError;

    fn try_from(restaurant: &Restaurant) -> Result<Self, Self::Error> {
        Ok(ActiveModel {
            id: Set(restaurant.id),
            trade_name: Set(restaurant.trade_name.clone()),
            legal_name: Set(restaurant.legal_name.clone()),
            tax_id: Set(restaurant.tax_id.clone()),
            phone: Set(restaurant.phone.clone()),
            whatsapp: Set(restaurant.whatsapp.clone()),
            email: Set(restaurant.email.clone()),
            slug: Set(restaurant.slug.clone()),
            address: Set(serde_json::to_value(&restaurant.address)?),
            logo_url: Set(restaurant.logo_url.clone()),
            banner_url: Set(restaurant.banner_url.clone()),
            settings: Set(serde_json::to_value(&restaurant.settings)?),
            active: Set(restaurant.active),
            created_at: Set(restaurant.created_at.into()),
            updated_at: Set(restaurant.updated_at.into()),
            deleted_at: Set(restaurant.deleted_at.map(Into::into)),
        })
    }
}
