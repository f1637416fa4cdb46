use block_storage::BlockStorage;
use database::{FindArgs, Page};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::models::{Category, CreateCategory, ReorderTarget, UpdateCategory};
use super::repository::CategoryRepository;
use crate::error::{AggregateKind, MenuError, MenuResult};
use crate::events::{AggregateRoot, EventAction, EventSink};
use crate::pictures::{self, BlobRef};
use crate::restaurants::RestaurantRepository;

/// Menu section use cases
#[derive(Clone)]
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    storage: Arc<dyn BlockStorage>,
    events: Arc<dyn EventSink>,
}

impl CategoryService {
    pub fn new(
        repository: Arc<dyn CategoryRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        storage: Arc<dyn BlockStorage>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            repository,
            restaurants,
            storage,
            events,
        }
    }

    pub async fn create(&self, input: CreateCategory) -> MenuResult<Category> {
        input
            .validate()
            .map_err(|e| MenuError::Validation(e.to_string()))?;

        if self.restaurants.find_by_id(input.restaurant_id).await?.is_none() {
            return Err(MenuError::reference_not_found(
                AggregateKind::Restaurant,
                input.restaurant_id,
            ));
        }
        self.ensure_unique(input.restaurant_id, &input.name, None).await?;

        let mut category = Category::new(input);
        let events = category.take_events();
        self.repository.create(&category).await?;
        self.events.publish(events).await;

        Ok(category)
    }

    pub async fn get(&self, id: Uuid) -> MenuResult<Category> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(MenuError::not_found(Category::KIND, id))
    }

    /// Listing is always scoped to one restaurant.
    pub async fn list(&self, args: &FindArgs) -> MenuResult<Page<Category>> {
        if args.filter_value("restaurant_id").is_none() {
            return Err(MenuError::Validation(
                "the restaurant_id filter is required".to_string(),
            ));
        }
        self.repository.find(args).await
    }

    /// Menu sections of a restaurant in display order
    pub async fn categories_of(&self, restaurant_id: Uuid) -> MenuResult<Vec<Category>> {
        if self.restaurants.find_by_id(restaurant_id).await?.is_none() {
            return Err(MenuError::not_found(AggregateKind::Restaurant, restaurant_id));
        }
        self.repository.find_by_restaurant(restaurant_id).await
    }

    pub async fn update(&self, id: Uuid, input: UpdateCategory) -> MenuResult<Category> {
        input
            .validate()
            .map_err(|e| MenuError::Validation(e.to_string()))?;

        let mut category = self.get(id).await?;
        let name = input.name.as_deref().unwrap_or(&category.name);
        self.ensure_unique(category.restaurant_id, name, Some(id)).await?;

        category.apply_update(input);
        self.save(category).await
    }

    pub async fn delete(&self, id: Uuid) -> MenuResult<()> {
        let mut category = self.get(id).await?;
        self.repository.delete(id).await?;

        category.raise(EventAction::Deleted);
        self.events.publish(category.take_events()).await;
        Ok(())
    }

    pub async fn activate(&self, id: Uuid) -> MenuResult<Category> {
        self.set_active(id, true).await
    }

    pub async fn deactivate(&self, id: Uuid) -> MenuResult<Category> {
        self.set_active(id, false).await
    }

    pub async fn reorder(&self, id: Uuid, target: ReorderTarget) -> MenuResult<Category> {
        match target {
            ReorderTarget::Priority(priority) => {
                if priority < 0 {
                    return Err(MenuError::Validation(
                        "priority must not be negative".to_string(),
                    ));
                }
                let mut category = self.get(id).await?;
                category.priority = priority;
                category.touch();
                self.save(category).await
            }
            ReorderTarget::SwapWith(swap_id) if swap_id == id => self.get(id).await,
            ReorderTarget::SwapWith(swap_id) => {
                let mut category = self.get(id).await?;
                let mut other = self.get(swap_id).await?;
                if category.restaurant_id != other.restaurant_id {
                    return Err(MenuError::Validation(
                        "categories belong to different restaurants".to_string(),
                    ));
                }

                std::mem::swap(&mut category.priority, &mut other.priority);
                category.touch();
                other.touch();

                let mut events = category.take_events();
                events.extend(other.take_events());
                self.repository.swap_priorities(&category, &other).await?;
                self.events.publish(events).await;

                Ok(category)
            }
        }
    }

    pub async fn set_picture(&self, id: Uuid, bytes: Vec<u8>) -> MenuResult<Category> {
        let mut category = self.get(id).await?;
        let blob = BlobRef::new(Category::KIND.bucket(), Category::KIND.picture_key(id));
        category.picture_url = Some(blob.save(self.storage.as_ref(), bytes).await?);
        category.touch();

        let events = category.take_events();
        pictures::persist_or_discard(
            self.storage.as_ref(),
            std::slice::from_ref(&blob),
            self.repository.update(&category),
        )
        .await?;
        self.events.publish(events).await;

        Ok(category)
    }

    /// No picture is not an error; the category comes back unchanged.
    pub async fn delete_picture(&self, id: Uuid) -> MenuResult<Category> {
        let mut category = self.get(id).await?;
        if category.picture_url.is_none() {
            return Ok(category);
        }

        category.picture_url = None;
        category.touch();
        let blob = BlobRef::new(Category::KIND.bucket(), Category::KIND.picture_key(id));
        pictures::remove_after_write(self.storage.as_ref(), &blob, self.save(category)).await
    }

    async fn set_active(&self, id: Uuid, active: bool) -> MenuResult<Category> {
        let mut category = self.get(id).await?;
        if category.active == active {
            return Ok(category);
        }
        category.active = active;
        category.touch();
        self.save(category).await
    }

    async fn ensure_unique(&self, restaurant_id: Uuid, name: &str, excluding: Option<Uuid>) -> MenuResult<()> {
        if self.repository.exists(restaurant_id, name, excluding).await? {
            return Err(MenuError::AlreadyExists(format!(
                "category '{}' already exists in restaurant {}",
                name, restaurant_id
            )));
        }
        Ok(())
    }

    async fn save(&self, mut category: Category) -> MenuResult<Category> {
        let events = category.take_events();
        self.repository.update(&category).await?;
        self.events.publish(events).await;
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::repository::{InMemoryCategoryRepository, MockCategoryRepository};
    use crate::events::TracingEventSink;
    use crate::restaurants::{InMemoryRestaurantRepository, Restaurant};
    use crate::testing;
    use block_storage::InMemoryStorage;
    use database::DatabaseError;

    struct Fixture {
        service: CategoryService,
        storage: InMemoryStorage,
        restaurant_id: Uuid,
    }

    async fn fixture_with(repository: Arc<dyn CategoryRepository>) -> Fixture {
        let restaurants = InMemoryRestaurantRepository::new();
        let restaurant = Restaurant::new(testing::create_restaurant("joes-diner"));
        restaurants.create(&restaurant).await.unwrap();

        let storage = InMemoryStorage::new();
        let service = CategoryService::new(
            repository,
            Arc::new(restaurants),
            Arc::new(storage.clone()),
            Arc::new(TracingEventSink),
        );
        Fixture {
            service,
            storage,
            restaurant_id: restaurant.id,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(Arc::new(InMemoryCategoryRepository::new())).await
    }

    #[tokio::test]
    async fn test_create_defaults_to_active() {
        let f = fixture().await;
        let category = f
            .service
            .create(testing::create_category(f.restaurant_id, "Burgers", 1))
            .await
            .unwrap();
        assert!(category.active);
        assert!(category.picture_url.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_name_in_same_restaurant_fails() {
        let f = fixture().await;
        f.service
            .create(testing::create_category(f.restaurant_id, "Burgers", 1))
            .await
            .unwrap();

        let result = f
            .service
            .create(testing::create_category(f.restaurant_id, "Burgers", 2))
            .await;
        assert!(matches!(result, Err(MenuError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_duplicate_is_rejected_before_any_write() {
        let mut repository = MockCategoryRepository::new();
        repository.expect_exists().returning(|_, _, _| Ok(true));
        repository.expect_create().never();
        let f = fixture_with(Arc::new(repository)).await;

        let result = f
            .service
            .create(testing::create_category(f.restaurant_id, "Burgers", 1))
            .await;
        assert!(matches!(result, Err(MenuError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_unknown_restaurant_is_reference_not_found() {
        let f = fixture().await;
        let result = f
            .service
            .create(testing::create_category(Uuid::now_v7(), "Burgers", 1))
            .await;
        assert!(matches!(
            result,
            Err(MenuError::ReferenceNotFound { kind: AggregateKind::Restaurant, .. })
        ));
    }

    #[tokio::test]
    async fn test_list_requires_restaurant_filter() {
        let f = fixture().await;
        assert!(matches!(
            f.service.list(&FindArgs::default()).await,
            Err(MenuError::Validation(_))
        ));

        let args = FindArgs::default().with_filter("restaurant_id", f.restaurant_id.to_string());
        assert!(f.service.list(&args).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_categories_of_orders_by_priority_then_name() {
        let f = fixture().await;
        for (name, priority) in [("Drinks", 2), ("Burgers", 1), ("Desserts", 2)] {
            f.service
                .create(testing::create_category(f.restaurant_id, name, priority))
                .await
                .unwrap();
        }

        let names: Vec<_> = f
            .service
            .categories_of(f.restaurant_id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Burgers", "Desserts", "Drinks"]);
    }

    #[tokio::test]
    async fn test_reorder_swaps_priorities() {
        let f = fixture().await;
        let a = f
            .service
            .create(testing::create_category(f.restaurant_id, "A", 5))
            .await
            .unwrap();
        let b = f
            .service
            .create(testing::create_category(f.restaurant_id, "B", 9))
            .await
            .unwrap();

        let moved = f.service.reorder(a.id, ReorderTarget::SwapWith(b.id)).await.unwrap();

        assert_eq!(moved.priority, 9);
        assert_eq!(f.service.get(a.id).await.unwrap().priority, 9);
        assert_eq!(f.service.get(b.id).await.unwrap().priority, 5);
    }

    #[tokio::test]
    async fn test_reorder_with_missing_swap_target_leaves_category_unchanged() {
        let f = fixture().await;
        let a = f
            .service
            .create(testing::create_category(f.restaurant_id, "A", 5))
            .await
            .unwrap();

        let result = f
            .service
            .reorder(a.id, ReorderTarget::SwapWith(Uuid::now_v7()))
            .await;

        assert!(matches!(result, Err(MenuError::NotFound { .. })));
        assert_eq!(f.service.get(a.id).await.unwrap(), a);
    }

    #[tokio::test]
    async fn test_reorder_swap_with_itself_is_noop() {
        let mut repository = MockCategoryRepository::new();
        let category = Category::new(testing::create_category(Uuid::now_v7(), "A", 3));
        let id = category.id;
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(category.clone())));
        repository.expect_swap_priorities().never();
        repository.expect_update().never();
        let f = fixture_with(Arc::new(repository)).await;

        let result = f.service.reorder(id, ReorderTarget::SwapWith(id)).await.unwrap();
        assert_eq!(result.priority, 3);
    }

    #[tokio::test]
    async fn test_failed_swap_is_reported() {
        let a = Category::new(testing::create_category(Uuid::nil(), "A", 1));
        let b = Category::new(testing::create_category(Uuid::nil(), "B", 2));
        let (a_id, b_id) = (a.id, b.id);

        let mut repository = MockCategoryRepository::new();
        repository.expect_find_by_id().returning(move |id| {
            Ok(Some(if id == a.id { a.clone() } else { b.clone() }))
        });
        repository
            .expect_swap_priorities()
            .times(1)
            .returning(|_, _| Err(DatabaseError::Generic("rolled back".into()).into()));
        let f = fixture_with(Arc::new(repository)).await;

        let result = f.service.reorder(a_id, ReorderTarget::SwapWith(b_id)).await;
        assert!(matches!(result, Err(MenuError::Persistence(_))));
    }

    #[tokio::test]
    async fn test_reorder_sets_priority_directly() {
        let f = fixture().await;
        let a = f
            .service
            .create(testing::create_category(f.restaurant_id, "A", 5))
            .await
            .unwrap();

        let moved = f.service.reorder(a.id, ReorderTarget::Priority(1)).await.unwrap();
        assert_eq!(moved.priority, 1);
        assert!(matches!(
            f.service.reorder(a.id, ReorderTarget::Priority(-1)).await,
            Err(MenuError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_activate_and_deactivate() {
        let f = fixture().await;
        let a = f
            .service
            .create(testing::create_category(f.restaurant_id, "A", 0))
            .await
            .unwrap();

        assert!(!f.service.deactivate(a.id).await.unwrap().active);
        assert!(!f.service.get(a.id).await.unwrap().active);
        assert!(f.service.activate(a.id).await.unwrap().active);
        assert!(f.service.activate(a.id).await.unwrap().active);
    }

    #[tokio::test]
    async fn test_set_and_delete_picture() {
        let f = fixture().await;
        let a = f
            .service
            .create(testing::create_category(f.restaurant_id, "A", 0))
            .await
            .unwrap();

        let with_picture = f.service.set_picture(a.id, vec![7, 7]).await.unwrap();
        assert_eq!(
            with_picture.picture_url,
            Some(format!("memory://product_categories/category_picture_{}", a.id))
        );

        let without = f.service.delete_picture(a.id).await.unwrap();
        assert!(without.picture_url.is_none());
        assert!(f.storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_picture_without_picture_is_noop() {
        let f = fixture().await;
        let a = f
            .service
            .create(testing::create_category(f.restaurant_id, "A", 0))
            .await
            .unwrap();

        let unchanged = f.service.delete_picture(a.id).await.unwrap();
        assert_eq!(unchanged, a);
        assert_eq!(unchanged.updated_at, a.updated_at);
    }

    #[tokio::test]
    async fn test_set_picture_discards_blob_when_update_fails() {
        let category = Category::new(testing::create_category(Uuid::nil(), "A", 0));
        let id = category.id;
        let mut repository = MockCategoryRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(category.clone())));
        repository
            .expect_update()
            .returning(|_| Err(DatabaseError::Generic("down".into()).into()));
        let f = fixture_with(Arc::new(repository)).await;

        let result = f.service.set_picture(id, vec![1]).await;

        assert!(matches!(result, Err(MenuError::Persistence(_))));
        assert!(f.storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_twice_then_not_found() {
        let f = fixture().await;
        let a = f
            .service
            .create(testing::create_category(f.restaurant_id, "A", 0))
            .await
            .unwrap();

        f.service.delete(a.id).await.unwrap();
        assert!(matches!(f.service.get(a.id).await, Err(MenuError::NotFound { .. })));
        assert!(matches!(f.service.delete(a.id).await, Err(MenuError::NotFound { .. })));
    }
}
