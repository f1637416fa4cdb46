use async_trait::async_trait;
use database::{FindArgs, MemoryTable, Page};
use uuid::Uuid;

use super::models::Dish;
use crate::error::MenuResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DishRepository: Send + Sync {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Dish>>;

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Dish>>;

    async fn create(&self, dish: &Dish) -> MenuResult<()>;

    async fn update(&self, dish: &Dish) -> MenuResult<()>;

    async fn delete(&self, id: Uuid) -> MenuResult<()>;

    async fn exists(&self, restaurant_id: Uuid, name: &str, excluding: Option<Uuid>) -> MenuResult<bool>;
}

#[derive(Clone, Default)]
pub struct InMemoryDishRepository {
    table: MemoryTable<Dish>,
}

impl InMemoryDishRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DishRepository for InMemoryDishRepository {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Dish>> {
        Ok(self.table.find(args).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Dish>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn create(&self, dish: &Dish) -> MenuResult<()> {
        self.table.insert(dish.clone()).await?;
        tracing::info!(dish_id = %dish.id, restaurant_id = %dish.restaurant_id, "Created dish");
        Ok(())
    }

    async fn update(&self, dish: &Dish) -> MenuResult<()> {
        self.table.update(dish.clone()).await;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> MenuResult<()> {
        if self.table.soft_delete(id).await > 0 {
            tracing::info!(dish_id = %id, "Deleted dish");
        }
        Ok(())
    }

    async fn exists(&self, restaurant_id: Uuid, name: &str, excluding: Option<Uuid>) -> MenuResult<bool> {
        Ok(self
            .table
            .any(|d| Some(d.id) != excluding && d.restaurant_id == restaurant_id && d.name == name)
            .await)
    }
}
