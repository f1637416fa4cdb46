use async_trait::async_trait;
use database::{FindArgs, MemoryTable, Page};
use uuid::Uuid;

use super::models::Restaurant;
use crate::error::MenuResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Non-deleted restaurants matching `args`
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Restaurant>>;

    /// `None` when the id is unknown or soft-deleted
    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Restaurant>>;

    async fn create(&self, restaurant: &Restaurant) -> MenuResult<()>;

    /// Overwrites the stored row; a missing or deleted id is a no-op.
    async fn update(&self, restaurant: &Restaurant) -> MenuResult<()>;

    /// Soft delete; repeating it is a no-op.
    async fn delete(&self, id: Uuid) -> MenuResult<()>;

    /// Whether another non-deleted restaurant uses `slug` or `tax_id`
    async fn exists(&self, slug: &str, tax_id: &str, excluding: Option<Uuid>) -> MenuResult<bool>;
}

#[derive(Clone, Default)]
pub struct InMemoryRestaurantRepository {
    table: MemoryTable<Restaurant>,
}

impl InMemoryRestaurantRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RestaurantRepository for InMemoryRestaurantRepository {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Restaurant>> {
        Ok(self.table.find(args).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Restaurant>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn create(&self, restaurant: &Restaurant) -> MenuResult<()> {
        self.table.insert(restaurant.clone()).await?;
        tracing::info!(restaurant_id = %restaurant.id, slug = %restaurant.slug, "Created restaurant");
        Ok(())
    }

    async fn update(&self, restaurant: &Restaurant) -> MenuResult<()> {
        self.table.update(restaurant.clone()).await;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> MenuResult<()> {
        if self.table.soft_delete(id).await > 0 {
            tracing::info!(restaurant_id = %id, "Deleted restaurant");
        }
        Ok(())
    }

    async fn exists(&self, slug: &str, tax_id: &str, excluding: Option<Uuid>) -> MenuResult<bool> {
        Ok(self
            .table
            .any(|r| Some(r.id) != excluding && (r.slug == slug || r.tax_id == tax_id))
            .await)
    }
}
