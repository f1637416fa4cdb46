use chrono::{DateTime, Utc};
use database::Record;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::dishes::DishType;
use crate::error::AggregateKind;
use crate::events::{AggregateRoot, EventAction, EventBuffer};

/// Dishes of each type a meal box is made of, e.g. two meats and one salad
pub type DishTypeMap = BTreeMap<DishType, u32>;

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() {
        return Err(ValidationError::new("negative_price").with_message("price must not be negative".into()));
    }
    Ok(())
}

/// Sellable item of a restaurant, listed under one of its categories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub restaurant_id: Uuid,
    pub category_id: Uuid,
    /// Unique per restaurant among non-deleted products
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "32.90")]
    pub sales_price: Decimal,
    /// For meal boxes, the cost of the packaging
    #[schema(value_type = String, example = "1.20")]
    pub cost_price: Decimal,
    pub picture_url: Option<String>,
    #[schema(value_type = BTreeMap<String, u32>)]
    pub dish_type_map: DishTypeMap,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) events: EventBuffer,
}

impl Product {
    pub fn new(input: CreateProduct) -> Self {
        let now = Utc::now();
        let mut product = Self {
            id: Uuid::now_v7(),
            restaurant_id: input.restaurant_id,
            category_id: input.category_id,
            name: input.name,
            description: input.description,
            sales_price: input.sales_price,
            cost_price: input.cost_price,
            picture_url: None,
            dish_type_map: input.dish_type_map,
            active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            events: EventBuffer::default(),
        };
        product.raise(EventAction::Created);
        product
    }

    pub fn apply_update(&mut self, update: UpdateProduct) {
        if let Some(category_id) = update.category_id {
            self.category_id = category_id;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(price) = update.sales_price {
            self.sales_price = price;
        }
        if let Some(price) = update.cost_price {
            self.cost_price = price;
        }
        if let Some(map) = update.dish_type_map {
            self.dish_type_map = map;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.raise(EventAction::Updated);
    }

    /// Sales price minus cost price
    pub fn margin(&self) -> Decimal {
        self.sales_price - self.cost_price
    }
}

impl AggregateRoot for Product {
    const KIND: AggregateKind = AggregateKind::Product;

    fn id(&self) -> Uuid {
        self.id
    }

    fn events_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Record for Product {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "restaurant_id",
        "category_id",
        "name",
        "description",
        "sales_price",
        "cost_price",
        "picture_url",
        "dish_type_map",
        "active",
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
pub struct CreateProduct {
    pub restaurant_id: Uuid,
    pub category_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
    #[schema(value_type = String, example = "32.90")]
    #[validate(custom(function = "validate_price"))]
    pub sales_price: Decimal,
    #[schema(value_type = String, example = "1.20")]
    #[validate(custom(function = "validate_price"))]
    pub cost_price: Decimal,
    #[serde(default)]
    #[schema(value_type = BTreeMap<String, u32>)]
    pub dish_type_map: DishTypeMap,
}

/// Absent fields are kept. The restaurant cannot change.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateProduct {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 120))]
    pub name: Option<String>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_price"))]
    pub sales_price: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    #[validate(custom(function = "validate_price"))]
    pub cost_price: Option<Decimal>,
    #[schema(value_type = Option<BTreeMap<String, u32>>)]
    pub dish_type_map: Option<DishTypeMap>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meal_box() -> CreateProduct {
        serde_json::from_value(json!({
            "restaurant_id": Uuid::now_v7(),
            "category_id": Uuid::now_v7(),
            "name": "Marmita P",
            "sales_price": "24.90",
            "cost_price": "1.10",
            "dish_type_map": { "meat": 2, "side_dish": 1, "accompaniment": 2 }
        }))
        .unwrap()
    }

    #[test]
    fn test_create_product_from_json() {
        let input = meal_box();
        assert!(input.validate().is_ok());
        assert_eq!(input.description, "");
        assert_eq!(input.dish_type_map.get(&DishType::Meat), Some(&2));
        assert_eq!(input.dish_type_map.len(), 3);
    }

    #[test]
    fn test_unknown_dish_type_is_rejected() {
        let result = serde_json::from_value::<CreateProduct>(json!({
            "restaurant_id": Uuid::now_v7(),
            "category_id": Uuid::now_v7(),
            "name": "Marmita",
            "sales_price": "1",
            "cost_price": "1",
            "dish_type_map": { "soup": 1 }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_new_product_is_active_and_prices_serialize_as_strings() {
        let product = Product::new(meal_box());
        assert!(product.active);
        assert_eq!(product.margin().to_string(), "23.80");

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["sales_price"], "24.90");
        assert_eq!(json["cost_price"], "1.10");
        assert_eq!(json["dish_type_map"]["side_dish"], 1);
    }

    #[test]
    fn test_negative_price_fails_validation() {
        let mut input = meal_box();
        input.cost_price = Decimal::new(-1, 0);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_apply_update_replaces_the_whole_map() {
        let mut product = Product::new(meal_box());
        product.apply_update(UpdateProduct {
            dish_type_map: Some(DishTypeMap::from([(DishType::Salad, 1)])),
            active: Some(false),
            ..Default::default()
        });
        assert_eq!(product.dish_type_map.len(), 1);
        assert!(!product.active);
        assert_eq!(product.name, "Marmita P");
    }
}
