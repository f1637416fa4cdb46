use async_trait::async_trait;
use database::{FindArgs, Page, SoftDeleteRepository};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection};
use uuid::Uuid;

use super::entity::{self, ActiveModel};
use super::models::Dish;
use super::repository::DishRepository;
use crate::error::MenuResult;

#[derive(Clone)]
pub struct PgDishRepository {
    base: SoftDeleteRepository<entity::Entity>,
}

impl PgDishRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: SoftDeleteRepository::new(db),
        }
    }
}

#[async_trait]
impl DishRepository for PgDishRepository {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Dish>> {
        Ok(self.base.find(args).await?.map(Dish::from))
    }

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Dish>> {
        Ok(self.base.find_by_id(id).await?.map(Dish::from))
    }

    async fn create(&self, dish: &Dish) -> MenuResult<()> {
        self.base.insert(ActiveModel::from(dish)).await?;
        tracing::info!(dish_id = %dish.id, restaurant_id = %dish.restaurant_id, "Created dish");
        Ok(())
    }

    async fn update(&self, dish: &Dish) -> MenuResult<()> {
        let rows = self.base.update(ActiveModel::from(dish)).await?;
        tracing::debug!(dish_id = %dish.id, rows, "Updated dish");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> MenuResult<()> {
        if self.base.soft_delete(id).await? > 0 {
            tracing::info!(dish_id = %id, "Deleted dish");
        }
        Ok(())
    }

    async fn exists(&self, restaurant_id: Uuid, name: &str, excluding: Option<Uuid>) -> MenuResult<bool> {
        let mut condition = Condition::all()
            .add(entity::Column::RestaurantId.eq(restaurant_id))
            .add(entity::Column::Name.eq(name));
        if let Some(id) = excluding {
            condition = condition.add(entity::Column::Id.ne(id));
        }
        Ok(self.base.exists(condition).await?)
    }
}
