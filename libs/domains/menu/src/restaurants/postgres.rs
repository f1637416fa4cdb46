use async_trait::async_trait;
use database::{FindArgs, Page, SoftDeleteRepository};
use sea_orm::{ColumnTrait, Condition, DatabaseConnection};
use uuid::Uuid;

use super::entity::{self, ActiveModel};
use super::models::Restaurant;
use super::repository::RestaurantRepository;
use crate::error::MenuResult;

#[derive(Clone)]
pub struct PgRestaurantRepository {
    base: SoftDeleteRepository<entity::Entity>,
}

impl PgRestaurantRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            base: SoftDeleteRepository::new(db),
        }
    }
}

#[async_trait]
impl RestaurantRepository for PgRestaurantRepository {
    async fn find(&self, args: &FindArgs) -> MenuResult<Page<Restaurant>> {
        Ok(self.base.find(args).await?.try_map(Restaurant::try_from)?)
    }

    async fn find_by_id(&self, id: Uuid) -> MenuResult<Option<Restaurant>> {
        match self.base.find_by_id(id).await? {
            Some(model) => Ok(Some(model.try_into()?)),
            None => Ok(None),
        }
    }

    async fn create(&self, restaurant: &Restaurant) -> MenuResult<()> {
        self.base.insert(ActiveModel::try_from(restaurant)?).await?;
        tracing::info!(restaurant_id = %restaurant.id, slug = %restaurant.slug, "Created restaurant");
        Ok(())
    }

    async fn update(&self, restaurant: &Restaurant) -> MenuResult<()> {
        let rows = self.base.update(ActiveModel::try_from(restaurant)?).await?;
        tracing::debug!(restaurant_id = %restaurant.id, rows, "Updated restaurant");
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> MenuResult<()> {
        if self.base.soft_delete(id).await? > 0 {
            tracing::info!(restaurant_id = %id, "Deleted restaurant");
        }
        Ok(())
    }

    async fn exists(&self, slug: &str, tax_id: &str, excluding: Option<Uuid>) -> MenuResult<bool> {
        let mut condition = Condition::all().add(
            Condition::any()
                .add(entity::Column::Slug.eq(slug))
                .add(entity::Column::TaxId.eq(tax_id)),
        );
        if let Some(id) = excluding {
            condition = condition.add(entity::Column::Id.ne(id));
        }
        Ok(self.base.exists(condition).await?)
    }
}
