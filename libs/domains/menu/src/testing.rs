//! Fixtures shared by the unit tests of every aggregate.

use async_trait::async_trait;
use block_storage::{BlockStorage, StorageError, StorageResult};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::io;
use uuid::Uuid;

use crate::categories::CreateCategory;
use crate::dishes::{CreateDish, DishType};
use crate::products::CreateProduct;
use crate::restaurants::CreateRestaurant;
use crate::restaurants::models::{Address, Settings};

pub fn address() -> Address {
    Address {
        alias: "Main".into(),
        street: "Rua das Flores".into(),
        number: "42".into(),
        complement: Some("Loja 2".into()),
        neighborhood: "Centro".into(),
        city: "Curitiba".into(),
        state: "PR".into(),
        country: "BR".into(),
        zip_code: "80000-000".into(),
        latitude: None,
        longitude: None,
    }
}

pub fn create_restaurant(slug: &str) -> CreateRestaurant {
    CreateRestaurant {
        trade_name: "Joe's Diner".into(),
        legal_name: "Joe's Diner LTDA".into(),
        tax_id: "12.345.678/0001-90".into(),
        phone: "+55 41 3333-0000".into(),
        whatsapp: String::new(),
        email: "joe@diner.example".into(),
        slug: slug.into(),
        address: address(),
        settings: Settings::default(),
    }
}

pub fn create_category(restaurant_id: Uuid, name: &str, priority: i32) -> CreateCategory {
    CreateCategory {
        restaurant_id,
        name: name.into(),
        priority,
    }
}

pub fn create_dish(restaurant_id: Uuid, name: &str, dish_type: DishType) -> CreateDish {
    CreateDish {
        restaurant_id,
        name: name.into(),
        dish_type,
        add_on_price: None,
    }
}

pub fn create_product(restaurant_id: Uuid, category_id: Uuid, name: &str) -> CreateProduct {
    CreateProduct {
        restaurant_id,
        category_id,
        name: name.into(),
        description: "Arroz, feijão e duas carnes".into(),
        sales_price: Decimal::new(2490, 2),
        cost_price: Decimal::new(110, 2),
        dish_type_map: BTreeMap::from([(DishType::Meat, 2), (DishType::Accompaniment, 2)]),
    }
}

/// Storage whose saves or deletes can be made to fail
#[derive(Debug, Default)]
pub struct FailingStorage {
    pub fail_saves: bool,
    pub fail_deletes: bool,
}

#[async_trait]
impl BlockStorage for FailingStorage {
    async fn save(&self, key: &str, bucket: &str, _bytes: Vec<u8>) -> StorageResult<String> {
        if self.fail_saves {
            return Err(StorageError::Io(io::Error::other("disk full")));
        }
        Ok(format!("memory://{}/{}", bucket, key))
    }

    async fn get(&self, key: &str, bucket: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    async fn delete(&self, _key: &str, _bucket: &str) -> StorageResult<()> {
        if self.fail_deletes {
            return Err(StorageError::Io(io::Error::other("permission denied")));
        }
        Ok(())
    }
}
