use async_trait::async_trait;
use database::{FindArgs, Page, SoftDeleteRepository};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use super::entity::{self, ActiveModel};
use super::models::Category;
use super::repository::CategoryRepository;
use crate::error::MenuResult;

#[derive(Clone)]
pub struct PgCategoryRepository {
    base: SoftDeleteRepository<entity::Entity>,
}

impl PgCategoryRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: SoftDeleteRepository::new(db),
        }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Category>> {
        Ok(self.base.find(args).await?.map(Category::from))
    }

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Category>> {
        Ok(self.base.find_by_id(id).await?.map(Category::from))
    }

    async fn find_by_restaurant(&self, restaurant_id: Uuid) -> MenuResult<Vec<Category>> {
        let select = entity::Entity::find()
            .filter(entity::Column::RestaurantId.eq(restaurant_id))
            .order_by_asc(entity::Column::Priority)
            .order_by_asc(entity::Column::Name);
        let models = self.base.find_all(select).await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    async fn create(&self, category: &Category) -> MenuResult<()> {
        self.base.insert(ActiveModel::from(category)).await?;
        tracing::info!(category_id = %category.id, restaurant_id = %category.restaurant_id, "Created category");
        Ok(())
    }

    async fn update(&self, category: &Category) -> MenuResult<()> {
        let rows = self.base.update(ActiveModel::from(category)).await?;
        tracing::debug!(category_id = %category.id, rows, "Updated category");
        Ok(())
    }

    async fn swap_priorities(&self, first: &Category, second: &Category) -> MenuResult<()> {
        let rows = self
            .base
            .update_all(vec![ActiveModel::from(first), ActiveModel::from(second)])
            .await?;
        tracing::info!(first = %first.id, second = %second.id, rows, "Swapped category priorities");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> MenuResult<()> {
        if self.base.soft_delete(id).await? > 0 {
            tracing::info!(category_id = %id, "Deleted category");
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
