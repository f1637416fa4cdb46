use chrono::{DateTime, Utc};
use database::Record;
use rust_decimal::Decimal;
use sea_orm::{DeriveActiveEnum, EnumIter};
use serde::{Deserialize, Serialize};
use strum::Display;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::AggregateKind;
use crate::events::{AggregateRoot, EventAction, EventBuffer};

/// Role a dish plays in a meal box
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "dish_type")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DishType {
    #[sea_orm(string_value = "meat")]
    Meat,
    #[sea_orm(string_value = "accompaniment")]
    Accompaniment,
    #[sea_orm(string_value = "side_dish")]
    SideDish,
    #[sea_orm(string_value = "dessert")]
    Dessert,
    #[sea_orm(string_value = "drink")]
    Drink,
    #[sea_orm(string_value = "salad")]
    Salad,
    #[sea_orm(string_value = "other")]
    Other,
}

fn validate_add_on_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("negative_price")
            .with_message("add-on price must not be negative".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Dish {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    /// Unique per restaurant among non-deleted dishes
    pub name: String,
    pub dish_type: DishType,
    pub picture_url: Option<String>,
    /// Extra charge when the dish is added to a box
    #[schema(value_type = Option<String>, example = "4.50")]
    pub add_on_price: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) events: EventBuffer,
}

impl Dish {
    pub fn new(input: CreateDish) -> Self {
        let now = Utc::now();
        let mut dish = Self {
            id: Uuid::now_v7(),
            restaurant_id: input.restaurant_id,
            name: input.name,
            dish_type: input.dish_type,
            picture_url: None,
            add_on_price: input.add_on_price,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            events: EventBuffer::default(),
        };
        dish.raise(EventAction::Created);
        dish
    }

    pub fn apply_update(&mut self, update: UpdateDish) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(dish_type) = update.dish_type {
            self.dish_type = dish_type;
        }
        if let Some(price) = update.add_on_price {
            self.add_on_price = Some(price);
        }
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.raise(EventAction::Updated);
    }
}

impl AggregateRoot for Dish {
    const KIND: AggregateKind = AggregateKind::Dish;

    fn id(&self) -> Uuid {
        self.id
    }

    fn events_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Record for Dish {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "restaurant_id",
        "name",
        "dish_type",
        "picture_url",
        "add_on_price",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateDish {
    pub restaurant_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub dish_type: DishType,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "4.50")]
    #[validate(custom(function = "validate_add_on_price"))]
    pub add_on_price: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateDish {
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    pub dish_type: Option<DishType>,
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_add_on_price"))]
    pub add_on_price: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveEnum;
    use std::str::FromStr;

    fn create(add_on_price: Option<&str>) -> CreateDish {
        CreateDish {
            restaurant_id: Uuid::now_v7(),
            name: "Farofa".to_string(),
            dish_type: DishType::SideDish,
            add_on_price: add_on_price.map(|p| Decimal::from_str(p).unwrap()),
        }
    }

    #[test]
    fn test_dish_type_wire_names() {
        assert_eq!(DishType::SideDish.to_string(), "side_dish");
        assert_eq!(
            DishType::try_from_value(&"accompaniment".to_string()).unwrap(),
            DishType::Accompaniment
        );
        assert!(DishType::try_from_value(&"pizza".to_string()).is_err());
        assert_eq!(
            serde_json::to_string(&DishType::SideDish).unwrap(),
            "\"side_dish\""
        );
    }

    #[test]
    fn test_negative_add_on_price_is_rejected() {
        assert!(create(Some("4.50")).validate().is_ok());
        assert!(create(None).validate().is_ok());
        assert!(create(Some("-1")).validate().is_err());
    }

    #[test]
    fn test_add_on_price_serializes_as_string() {
        let dish = Dish::new(create(Some("4.50")));
        let json = serde_json::to_value(&dish).unwrap();
        assert_eq!(json["add_on_price"], "4.50");
        assert_eq!(json["dish_type"], "side_dish");
        assert!(json.get("events").is_none());
    }

    #[test]
    fn test_apply_update_keeps_absent_fields() {
        let mut dish = Dish::new(create(Some("2")));
        let before = dish.updated_at;
        dish.apply_update(UpdateDish {
            dish_type: Some(DishType::Salad),
            ..Default::default()
        });
        assert_eq!(dish.name, "Farofa");
        assert_eq!(dish.dish_type, DishType::Salad);
        assert_eq!(dish.add_on_price, Some(Decimal::from(2)));
        assert!(dish.updated_at >= before);
        assert_eq!(dish.take_events().len(), 2);
    }
}
