use async_trait::async_trait;
use database::{FindArgs, MemoryTable, Page};
use uuid::Uuid;

use super::models::Product;
use crate::error::MenuResult;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Product>>;

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Product>>;

    async fn create(&self, product: &Product) -> MenuResult<()>;

    async fn update(&self, product: &Product) -> MenuResult<()>;

    async fn delete(&self, id: Uuid) -> MenuResult<()>;

    async fn exists(&self, restaurant_id: Uuid, name: &str, excluding: Option<Uuid>) -> MenuResult<bool>;
}

#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    table: MemoryTable<Product>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Product>> {
        Ok(self.table.find(args).await?)
    }

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Product>> {
        Ok(self.table.find_by_id(id).await)
    }

    async fn create(&self, product: &Product) -> MenuResult<()> {
        self.table.insert(product.clone()).await?;
        tracing::info!(product_id = %product.id, category_id = %product.category_id, "Created product");
        Ok(())
    }

    async fn update(&self, product: &Product) -> MenuResult<()> {
        self.table.update(product.clone()).await;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> MenuResult<()> {
        if self.table.soft_delete(id).await > 0 {
            tracing::info!(product_id = %id, "Deleted product");
        }
        Ok(())
    }

    async fn exists(&self, restaurant_id: Uuid, name: &str, excluding: Option<Uuid>) -> MenuResult<bool> {
        Ok(self
            .table
            .any(|p| Some(p.id) != excluding && p.restaurant_id == restaurant_id && p.name == name)
            .await)
    }
}
