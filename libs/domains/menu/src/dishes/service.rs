use block_storage::BlockStorage;
use database::{FindArgs, Page};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::models::{CreateDish, Dish, UpdateDish};
use super::repository::DishRepository;
use crate::error::{AggregateKind, MenuError, MenuResult};
use crate::events::{AggregateRoot, EventAction, EventSink};
use crate::pictures::{self, BlobRef};
use crate::restaurants::RestaurantRepository;

/// Dish use cases
#[derive(Clone)]
pub struct DishService {
    repository: Arc<dyn DishRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    storage: Arc<dyn BlockStorage>,
    events: Arc<dyn EventSink>,
}

impl DishService {
    pub fn new(
        repository: Arc<dyn DishRepository>,
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

    pub async fn create(&self, input: CreateDish) -> MenuResult<Dish> {
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

        let mut dish = Dish::new(input);
        let events = dish.take_events();
        self.repository.create(&dish).await?;
        self.events.publish(events).await;

        Ok(dish)
    }

    pub async fn get(&self, id: Uuid) -> MenuResult<Dish> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(MenuError::not_found(Dish::KIND, id))
    }

    pub async fn list(&self, args: &FindArgs) -> MenuResult<Page<Dish>> {
        self.repository.find(args).await
    }

    pub async fn update(&self, id: Uuid, input: UpdateDish) -> MenuResult<Dish> {
        input
            .validate()
            .map_err(|e| MenuError::Validation(e.to_string()))?;

        let mut dish = self.get(id).await?;
        let name = input.name.as_deref().unwrap_or(&dish.name);
        self.ensure_unique(dish.restaurant_id, name, Some(id)).await?;

        dish.apply_update(input);
        self.save(dish).await
    }

    pub async fn delete(&self, id: Uuid) -> MenuResult<()> {
        let mut dish = self.get(id).await?;
        self.repository.delete(id).await?;

        dish.raise(EventAction::Deleted);
        self.events.publish(dish.take_events()).await;
        Ok(())
    }

    pub async fn set_picture(&self, id: Uuid, bytes: Vec<u8>) -> MenuResult<Dish> {
        let mut dish = self.get(id).await?;
        let blob = BlobRef::new(Dish::KIND.bucket(), Dish::KIND.picture_key(id));
        dish.picture_url = Some(blob.save(self.storage.as_ref(), bytes).await?);
        dish.touch();

        let events = dish.take_events();
        pictures::persist_or_discard(
            self.storage.as_ref(),
            std::slice::from_ref(&blob),
            self.repository.update(&dish),
        )
        .await?;
        self.events.publish(events).await;

        Ok(dish)
    }

    pub async fn delete_picture(&self, id: Uuid) -> MenuResult<Dish> {
        let mut dish = self.get(id).await?;
        if dish.picture_url.is_none() {
            return Ok(dish);
        }

        dish.picture_url = None;
        dish.touch();
        let blob = BlobRef::new(Dish::KIND.bucket(), Dish::KIND.picture_key(id));
        pictures::remove_after_write(self.storage.as_ref(), &blob, self.save(dish)).await
    }

    async fn ensure_unique(&self, restaurant_id: Uuid, name: &str, excluding: Option<Uuid>) -> MenuResult<()> {
        if self.repository.exists(restaurant_id, name, excluding).await? {
            return Err(MenuError::AlreadyExists(format!(
                "dish '{}' already exists in restaurant {}",
                name, restaurant_id
            )));
        }
        Ok(())
    }

    async fn save(&self, mut dish: Dish) -> MenuResult<Dish> {
        let events = dish.take_events();
        self.repository.update(&dish).await?;
        self.events.publish(events).await;
        Ok(dish)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dishes::models::DishType;
    use crate::dishes::repository::{InMemoryDishRepository, MockDishRepository};
    use crate::events::{DomainEvent, MockEventSink, TracingEventSink};
    use crate::restaurants::{InMemoryRestaurantRepository, Restaurant};
    use crate::testing;
    use block_storage::InMemoryStorage;

    struct Fixture {
        service: DishService,
        storage: InMemoryStorage,
        restaurant_id: Uuid,
    }

    async fn fixture_with(repository: Arc<dyn DishRepository>, events: Arc<dyn EventSink>) -> Fixture {
        let restaurants = InMemoryRestaurantRepository::new();
        let restaurant = Restaurant::new(testing::create_restaurant("casa-da-vo"));
        restaurants.create(&restaurant).await.unwrap();

        let storage = InMemoryStorage::new();
        Fixture {
            service: DishService::new(
                repository,
                Arc::new(restaurants),
                Arc::new(storage.clone()),
                events,
            ),
            storage,
            restaurant_id: restaurant.id,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with(Arc::new(InMemoryDishRepository::new()), Arc::new(TracingEventSink)).await
    }

    #[tokio::test]
    async fn test_create_publishes_created_event() {
        let mut events = MockEventSink::new();
        events
            .expect_publish()
            .withf(|events: &Vec<DomainEvent>| {
                events.len() == 1 && events[0].name() == "dish.created"
            })
            .times(1)
            .return_const(());
        let f = fixture_with(Arc::new(InMemoryDishRepository::new()), Arc::new(events)).await;

        let dish = f
            .service
            .create(testing::create_dish(f.restaurant_id, "Feijoada", DishType::Meat))
            .await
            .unwrap();
        assert!(dish.events.pending().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_name_fails_already_exists() {
        let f = fixture().await;
        f.service
            .create(testing::create_dish(f.restaurant_id, "Feijoada", DishType::Meat))
            .await
            .unwrap();

        let result = f
            .service
            .create(testing::create_dish(f.restaurant_id, "Feijoada", DishType::Other))
            .await;
        assert!(matches!(result, Err(MenuError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_unknown_restaurant_is_rejected_without_write() {
        let mut repository = MockDishRepository::new();
        repository.expect_exists().never();
        repository.expect_create().never();
        let f = fixture_with(Arc::new(repository), Arc::new(TracingEventSink)).await;

        let result = f
            .service
            .create(testing::create_dish(Uuid::now_v7(), "Feijoada", DishType::Meat))
            .await;
        assert!(matches!(result, Err(MenuError::ReferenceNotFound { .. })));
    }

    #[tokio::test]
    async fn test_update_can_keep_its_own_name() {
        let f = fixture().await;
        let dish = f
            .service
            .create(testing::create_dish(f.restaurant_id, "Arroz", DishType::Accompaniment))
            .await
            .unwrap();

        let updated = f
            .service
            .update(
                dish.id,
                UpdateDish {
                    name: Some("Arroz".to_string()),
                    dish_type: Some(DishType::SideDish),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.dish_type, DishType::SideDish);
    }

    #[tokio::test]
    async fn test_update_missing_dish_is_not_found() {
        let f = fixture().await;
        let result = f.service.update(Uuid::now_v7(), UpdateDish::default()).await;
        assert!(matches!(
            result,
            Err(MenuError::NotFound { kind: AggregateKind::Dish, .. })
        ));
    }

    #[tokio::test]
    async fn test_list_filters_by_dish_type() {
        let f = fixture().await;
        for (name, dish_type) in [
            ("Farofa", DishType::SideDish),
            ("Pudim", DishType::Dessert),
            ("Vinagrete", DishType::SideDish),
        ] {
            f.service
                .create(testing::create_dish(f.restaurant_id, name, dish_type))
                .await
                .unwrap();
        }

        let args = FindArgs::default()
            .with_filter("dish_type", "side_dish")
            .sorted_by("name", true);
        let page = f.service.list(&args).await.unwrap();

        assert_eq!(page.meta.total_records, 2);
        assert_eq!(page.records[0].name, "Farofa");
        assert_eq!(page.records[1].name, "Vinagrete");
    }

    #[tokio::test]
    async fn test_picture_lifecycle() {
        let f = fixture().await;
        let dish = f
            .service
            .create(testing::create_dish(f.restaurant_id, "Pudim", DishType::Dessert))
            .await
            .unwrap();

        let with_picture = f.service.set_picture(dish.id, vec![1, 2, 3]).await.unwrap();
        let key = format!("dish_picture_{}", dish.id);
        assert_eq!(with_picture.picture_url, Some(format!("memory://dishes/{}", key)));
        assert!(f.storage.contains(&key, "dishes").await);

        let cleared = f.service.delete_picture(dish.id).await.unwrap();
        assert!(cleared.picture_url.is_none());
        assert!(!f.storage.contains(&key, "dishes").await);

        let unchanged = f.service.delete_picture(dish.id).await.unwrap();
        assert_eq!(unchanged, cleared);
    }

    #[tokio::test]
    async fn test_storage_failure_leaves_dish_untouched() {
        let repository = Arc::new(InMemoryDishRepository::new());
        let restaurants = InMemoryRestaurantRepository::new();
        let restaurant = Restaurant::new(testing::create_restaurant("casa-da-vo"));
        restaurants.create(&restaurant).await.unwrap();
        let service = DishService::new(
            repository.clone(),
            Arc::new(restaurants),
            Arc::new(testing::FailingStorage {
                fail_saves: true,
                ..Default::default()
            }),
            Arc::new(TracingEventSink),
        );
        let dish = service
            .create(testing::create_dish(restaurant.id, "Pudim", DishType::Dessert))
            .await
            .unwrap();

        let result = service.set_picture(dish.id, vec![1]).await;

        assert!(matches!(result, Err(MenuError::Storage(_))));
        assert!(service.get(dish.id).await.unwrap().picture_url.is_none());
    }

    #[tokio::test]
    async fn test_picture_is_cleared_when_blob_delete_fails() {
        let restaurants = InMemoryRestaurantRepository::new();
        let restaurant = Restaurant::new(testing::create_restaurant("casa-da-vo"));
        restaurants.create(&restaurant).await.unwrap();
        let service = DishService::new(
            Arc::new(InMemoryDishRepository::new()),
            Arc::new(restaurants),
            Arc::new(testing::FailingStorage {
                fail_deletes: true,
                ..Default::default()
            }),
            Arc::new(TracingEventSink),
        );
        let dish = service
            .create(testing::create_dish(restaurant.id, "Pudim", DishType::Dessert))
            .await
            .unwrap();
        service.set_picture(dish.id, vec![1]).await.unwrap();

        let cleared = service.delete_picture(dish.id).await.unwrap();

        assert!(cleared.picture_url.is_none());
        assert!(service.get(dish.id).await.unwrap().picture_url.is_none());
    }

    #[tokio::test]
    async fn test_deleted_dish_disappears() {
        let f = fixture().await;
        let dish = f
            .service
            .create(testing::create_dish(f.restaurant_id, "Pudim", DishType::Dessert))
            .await
            .unwrap();

        f.service.delete(dish.id).await.unwrap();

        assert!(matches!(f.service.get(dish.id).await, Err(MenuError::NotFound { .. })));
        assert!(f.service.list(&FindArgs::default()).await.unwrap().is_empty());
        f.service
            .create(testing::create_dish(f.restaurant_id, "Pudim", DishType::Dessert))
            .await
            .unwrap();
    }
}
