use async_trait::async_trait;
use database::{FindArgs, MemoryTable, Page};
use uuid::Uuid;

use super::models::Category;
use crate::error::MenuResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Category>>;

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Category>>;

    /// Non-deleted categories of a restaurant by `priority`, then `name`
    async fn find_by_restaurant(&self, restaurant_id: Uuid) -> MenuResult<Vec<Category>>;

    async fn create(&self, category: &Category) -> MenuResult<()>;

    async fn update(&self, category: &Category) -> MenuResult<()>;

    /// Persists both categories or neither.
    async fn swap_priorities(&self, first: &Category, second: &Category) -> MenuResult<()>;

    async fn delete(&self, id: Uuid) -> MenuResult<()>;

    async fn exists(&self, restaurant_id: Uuid, name: &str, excluding: Option<Uuid>) -> MenuResult<bool>;
}

#[derive(Clone, Default)]
pub struct InMemoryCategoryRepository {
    table: MemoryTable<Category>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Category>> {
        Ok(self.table.find(args).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Category>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn find_by_restaurant(&self, restaurant_id: Uuid) -> MenuResult<Vec<Category>> {
        let mut categories = self
            .table
            .select(|c| c.restaurant_id == restaurant_id)
            .await;
        categories.sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.name.cmp(&b.name)));
        Ok(categories)
    }

    async fn create(&self, category: &Category) -> MenuResult<()> {
        self.table.insert(category.clone()).await?;
        tracing::info!(category_id = %category.id, restaurant_id = %category.restaurant_id, "Created category");
        Ok(())
    }

    async fn update(&self, category: &Category) -> MenuResult<()> {
        self.table.update(category.clone()).await;
        Ok(())
    }

    async fn swap_priorities(&self, first: &Category, second: &Category) -> MenuResult<()> {
        self.table
            .update_all(vec![first.clone(), second.clone()])
            .await;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> MenuResult<()> {
        if self.table.soft_delete(id).await > 0 {
            tracing::info!(category_id = %id, "Deleted category");
        }
        Ok(())
    }

    async fn exists(&self, restaurant_id: Uuid, name: &str, excluding: Option<Uuid>) -> MenuResult<bool> {
        Ok(self
            .table
            .any(|c| Some(c.id) != excluding && c.restaurant_id == restaurant_id && c.name == name)
            .await)
    }
}
