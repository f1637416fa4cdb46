use async_trait::async_trait;
use database::{FindArgs, Page, SoftDeleteRepository};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection};
use uuid::Uuid;

use super::entity::{self, ActiveModel};
use super::models::Product;
use super::repository::ProductRepository;
use crate::error::MenuResult;

#[derive(Clone)]
pub struct PgProductRepository {
    base: SoftDeleteRepository<entity::Entity>,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: SoftDeleteRepository::new(db),
        }
    }
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Product>> {
        Ok(self.base.find(args).await?.try_map(Product::try_from)?)
    }

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Product>> {
        match self.base.find_by_id(id).await? {
            Some(model) => Ok(Some(model.try_into()?)),
            None => Ok(None),
        }
    }

    async fn create(&self, product: &Product) -> MenuResult<()> {
        self.base.insert(ActiveModel::try_from(product)?).await?;
        tracing::info!(product_id = %product.id, category_id = %product.category_id, "Created product");
        Ok(())
    }

    async fn update(&self, product: &Product) -> MenuResult<()> {
        let rows = self.base.update(ActiveModel::try_from(product)?).await?;
        tracing::debug!(product_id = %product.id, rows, "Updated product");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> MenuResult<()> {
        if self.base.soft_delete(id).await? > 0 {
            tracing::info!(product_id = %id, "Deleted product");
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
