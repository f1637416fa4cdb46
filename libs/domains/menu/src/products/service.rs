use block_storage::BlockStorage;
use database::{FindArgs, Page};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::models::{CreateProduct, Product, UpdateProduct};
use super::repository::ProductRepository;
use crate::categories::CategoryRepository;
use crate::error::{AggregateKind, MenuError, MenuResult};
use crate::events::{AggregateRoot, EventAction, EventSink};
use crate::pictures::{self, BlobRef};
use crate::restaurants::RestaurantRepository;

/// Product use cases
#[derive(Clone)]
pub struct ProductService {
    repository: Arc<dyn ProductRepository>,
    categories: Arc<dyn CategoryRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    storage: Arc<dyn BlockStorage>,
    events: Arc<dyn EventSink>,
}

impl ProductService {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        categories: Arc<dyn CategoryRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        storage: Arc<dyn BlockStorage>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            repository,
            categories,
            restaurants,
            storage,
            events,
        }
    }

    pub async fn create(&self, input: CreateProduct) -> MenuResult<Product> {
        input
            .validate()
            .map_err(|e| MenuError::Validation(e.to_string()))?;

        self.ensure_references(input.restaurant_id, input.category_id).await?;
        self.ensure_unique(input.restaurant_id, &input.name, None).await?;

        let mut product = Product::new(input);
        let events = product.take_events();
        self.repository.create(&product).await?;
        self.events.publish(events).await;

        Ok(product)
    }

    pub async fn get(&self, id: Uuid) -> MenuResult<Product> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(MenuError::not_found(Product::KIND, id))
    }

    pub async fn list(&self, args: &FindArgs) -> MenuResult<Page<Product>> {
        self.repository.find(args).await
    }

    pub async fn update(&self, id: Uuid, input: UpdateProduct) -> MenuResult<Product> {
        input
            .validate()
            .map_err(|e| MenuError::Validation(e.to_string()))?;

        let mut product = self.get(id).await?;

        let category_id = input.category_id.unwrap_or(product.category_id);
        self.ensure_references(product.restaurant_id, category_id).await?;
        let name = input.name.as_deref().unwrap_or(&product.name);
        self.ensure_unique(product.restaurant_id, name, Some(id)).await?;

        product.apply_update(input);
        self.save(product).await
    }

    pub async fn delete(&self, id: Uuid) -> MenuResult<()> {
        let mut product = self.get(id).await?;
        self.repository.delete(id).await?;

        product.raise(EventAction::Deleted);
        self.events.publish(product.take_events()).await;
        Ok(())
    }

    pub async fn set_picture(&self, id: Uuid, bytes: Vec<u8>) -> MenuResult<Product> {
        let mut product = self.get(id).await?;
        let blob = BlobRef::new(Product::KIND.bucket(), Product::KIND.picture_key(id));
        product.picture_url = Some(blob.save(self.storage.as_ref(), bytes).await?);
        product.touch();

        let events = product.take_events();
        pictures::persist_or_discard(
            self.storage.as_ref(),
            std::slice::from_ref(&blob),
            self.repository.update(&product),
        )
        .await?;
        self.events.publish(events).await;

        Ok(product)
    }

    pub async fn delete_picture(&self, id: Uuid) -> MenuResult<Product> {
        let mut product = self.get(id).await?;
        if product.picture_url.is_none() {
            return Ok(product);
        }

        product.picture_url = None;
        product.touch();
        let blob = BlobRef::new(Product::KIND.bucket(), Product::KIND.picture_key(id));
        pictures::remove_after_write(self.storage.as_ref(), &blob, self.save(product)).await
    }

    /// Restaurant and category must exist, and the category must be one of
    /// the restaurant's.
    async fn ensure_references(&self, restaurant_id: Uuid, category_id: Uuid) -> MenuResult<()> {
        if self.restaurants.find_by_id(restaurant_id).await?.is_none() {
            return Err(MenuError::reference_not_found(AggregateKind::Restaurant, restaurant_id));
        }

        let category = self
            .categories
            .find_by_id(category_id)
            .await?
            .ok_or(MenuError::reference_not_found(AggregateKind::Category, category_id))?;
        if category.restaurant_id != restaurant_id {
            return Err(MenuError::Validation(format!(
                "category {} does not belong to restaurant {}",
                category_id, restaurant_id
            )));
        }
        Ok(())
    }

    async fn ensure_unique(&self, restaurant_id: Uuid, name: &str, excluding: Option<Uuid>) -> MenuResult<()> {
        if self.repository.exists(restaurant_id, name, excluding).await? {
            return Err(MenuError::AlreadyExists(format!(
                "product '{}' already exists in restaurant {}",
                name, restaurant_id
            )));
        }
        Ok(())
    }

    async fn save(&self, mut product: Product) -> MenuResult<Product> {
        let events = product.take_events();
        self.repository.update(&product).await?;
        self.events.publish(events).await;
        Ok(product)
    }
}
