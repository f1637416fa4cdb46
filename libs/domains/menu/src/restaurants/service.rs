use block_storage::BlockStorage;
use database::{FindArgs, Page};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::models::{CreateRestaurant, Restaurant, RestaurantSummary, UpdateRestaurant};
use super::repository::RestaurantRepository;
use crate::error::{MenuError, MenuResult};
use crate::events::{AggregateRoot, EventAction, EventSink};
use crate::pictures::{self, BlobRef};

/// Restaurant use cases
#[derive(Clone)]
pub struct RestaurantService {
    repository: Arc<dyn RestaurantRepository>,
    storage: Arc<dyn BlockStorage>,
    events: Arc<dyn EventSink>,
}

impl RestaurantService {
    pub fn new(
        repository: Arc<dyn RestaurantRepository>,
        storage: Arc<dyn BlockStorage>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            repository,
            storage,
            events,
        }
    }

    pub async fn create(&self, input: CreateRestaurant) -> MenuResult<Restaurant> {
        input
            .validate()
            .map_err(|e| MenuError::Validation(e.to_string()))?;

        self.ensure_unique(&input.slug, &input.tax_id, None).await?;

        let mut restaurant = Restaurant::new(input);
        let events = restaurant.take_events();
        self.repository.create(&restaurant).await?;
        self.events.publish(events).await;

        Ok(restaurant)
    }

    pub async fn get(&self, id: Uuid) -> MenuResult<Restaurant> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(MenuError::not_found(Restaurant::KIND, id))
    }

    /// Summaries only; the tax id stays out of listings.
    pub async fn list(&self, args: &FindArgs) -> MenuResult<Page<RestaurantSummary>> {
        Ok(self.repository.find(args).await?.map(Restaurant::summary))
    }

    pub async fn update(&self, id: Uuid, input: UpdateRestaurant) -> MenuResult<Restaurant> {
        input
            .validate()
            .map_err(|e| MenuError::Validation(e.to_string()))?;

        let mut restaurant = self.get(id).await?;

        let slug = input.slug.as_deref().unwrap_or(&restaurant.slug);
        let tax_id = input.tax_id.as_deref().unwrap_or(&restaurant.tax_id);
        self.ensure_unique(slug, tax_id, Some(id)).await?;

        restaurant.apply_update(input);
        self.save(restaurant).await
    }

    pub async fn delete(&self, id: Uuid) -> MenuResult<()> {
        let mut restaurant = self.get(id).await?;
        self.repository.delete(id).await?;

        restaurant.raise(EventAction::Deleted);
        self.events.publish(restaurant.take_events()).await;
        Ok(())
    }

    /// Stores whichever of logo and banner is present, then persists both URLs
    /// with one update.
    pub async fn set_images(
        &self,
        id: Uuid,
        logo: Option<Vec<u8>>,
        banner: Option<Vec<u8>>,
    ) -> MenuResult<Restaurant> {
        if logo.is_none() && banner.is_none() {
            return Err(MenuError::Validation(
                "at least one of logo or banner is required".to_string(),
            ));
        }

        let mut restaurant = self.get(id).await?;
        let bucket = Restaurant::KIND.bucket();
        let mut saved = Vec::new();

        let slots = [
            (format!("restaurants_{}_logo", id), logo, &mut restaurant.logo_url),
            (format!("restaurants_{}_banner", id), banner, &mut restaurant.banner_url),
        ];
        for (key, bytes, url) in slots {
            let Some(bytes) = bytes else { continue };
            let blob = BlobRef::new(bucket, key);
            match blob.save(self.storage.as_ref(), bytes).await {
                Ok(stored) => {
                    *url = Some(stored);
                    saved.push(blob);
                }
                Err(err) => {
                    pictures::discard(self.storage.as_ref(), &saved).await;
                    return Err(err);
                }
            }
        }

        restaurant.touch();
        let events = restaurant.take_events();
        pictures::persist_or_discard(
            self.storage.as_ref(),
            &saved,
            self.repository.update(&restaurant),
        )
        .await?;
        self.events.publish(events).await;

        tracing::info!(restaurant_id = %id, images = saved.len(), "Updated restaurant images");
        Ok(restaurant)
    }

    async fn ensure_unique(&self, slug: &str, tax_id: &str, excluding: Option<Uuid>) -> MenuResult<()> {
        if self.repository.exists(slug, tax_id, excluding).await? {
            return Err(MenuError::AlreadyExists(format!(
                "restaurant with slug '{}' or tax id '{}' already exists",
                slug, tax_id
            )));
        }
        Ok(())
    }

    async fn save(&self, mut restaurant: Restaurant) -> MenuResult<Restaurant> {
        let events = restaurant.take_events();
        self.repository.update(&restaurant).await?;
        self.events.publish(events).await;
        Ok(restaurant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{DomainEvent, MockEventSink, TracingEventSink};
    use crate::restaurants::repository::{InMemoryRestaurantRepository, MockRestaurantRepository};
    use crate::testing;
    use block_storage::{InMemoryStorage, StorageError};
    use database::DatabaseError;

    fn service_with(repository: impl RestaurantRepository + 'static) -> (RestaurantService, InMemoryStorage) {
        let storage = InMemoryStorage::new();
        let service = RestaurantService::new(
            Arc::new(repository),
            Arc::new(storage.clone()),
            Arc::new(TracingEventSink),
        );
        (service, storage)
    }

    #[tokio::test]
    async fn test_create_assigns_identity_and_defaults() {
        let (service, _) = service_with(InMemoryRestaurantRepository::new());

        let restaurant = service.create(testing::create_restaurant("joes-diner")).await.unwrap();

        assert!(restaurant.active);
        assert_eq!(restaurant.slug, "joes-diner");
        assert_eq!(service.get(restaurant.id).await.unwrap(), restaurant);
    }

    #[tokio::test]
    async fn test_duplicate_slug_fails_with_already_exists() {
        let (service, _) = service_with(InMemoryRestaurantRepository::new());
        service.create(testing::create_restaurant("joes-diner")).await.unwrap();

        let mut second = testing::create_restaurant("joes-diner");
        second.tax_id = "99.999.999/0001-99".into();
        let result = service.create(second).await;

        assert!(matches!(result, Err(MenuError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_duplicate_is_rejected_before_any_write() {
        let mut repository = MockRestaurantRepository::new();
        repository.expect_exists().returning(|_, _, _| Ok(true));
        repository.expect_create().never();
        let (service, _) = service_with(repository);

        let result = service.create(testing::create_restaurant("joes-diner")).await;
        assert!(matches!(result, Err(MenuError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_repository() {
        let mut repository = MockRestaurantRepository::new();
        repository.expect_exists().never();
        let (service, _) = service_with(repository);

        let result = service.create(testing::create_restaurant("Not A Slug")).await;
        assert!(matches!(result, Err(MenuError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_keeps_own_slug_and_rejects_taken_one() {
        let (service, _) = service_with(InMemoryRestaurantRepository::new());
        let joes = service.create(testing::create_restaurant("joes-diner")).await.unwrap();
        let mut other = testing::create_restaurant("marias");
        other.tax_id = "11.111.111/0001-11".into();
        service.create(other).await.unwrap();

        let renamed = service
            .update(
                joes.id,
                UpdateRestaurant {
                    trade_name: Some("Joe's".into()),
                    slug: Some("joes-diner".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.trade_name, "Joe's");
        assert!(renamed.updated_at >= joes.updated_at);

        let taken = service
            .update(
                joes.id,
                UpdateRestaurant {
                    slug: Some("marias".into()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(taken, Err(MenuError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let (service, _) = service_with(InMemoryRestaurantRepository::new());
        let result = service.update(Uuid::now_v7(), UpdateRestaurant::default()).await;
        assert!(matches!(result, Err(MenuError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_delete_hides_restaurant_and_second_delete_is_not_found() {
        let (service, _) = service_with(InMemoryRestaurantRepository::new());
        let restaurant = service.create(testing::create_restaurant("joes-diner")).await.unwrap();

        service.delete(restaurant.id).await.unwrap();

        assert!(matches!(service.get(restaurant.id).await, Err(MenuError::NotFound { .. })));
        assert!(service.list(&FindArgs::default()).await.unwrap().is_empty());
        assert!(matches!(service.delete(restaurant.id).await, Err(MenuError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_deleted_slug_can_be_reused() {
        let (service, _) = service_with(InMemoryRestaurantRepository::new());
        let first = service.create(testing::create_restaurant("joes-diner")).await.unwrap();
        service.delete(first.id).await.unwrap();

        assert!(service.create(testing::create_restaurant("joes-diner")).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_returns_summaries() {
        let (service, _) = service_with(InMemoryRestaurantRepository::new());
        service.create(testing::create_restaurant("joes-diner")).await.unwrap();

        let page = service
            .list(&FindArgs::new(10, 0).with_filter("slug", "joes-diner"))
            .await
            .unwrap();

        assert_eq!(page.meta.total_records, 1);
        assert_eq!(page.records[0].slug, "joes-diner");
        assert!(page.records[0].address.contains("Curitiba"));
    }

    #[tokio::test]
    async fn test_set_images_applies_only_supplied_files() {
        let (service, storage) = service_with(InMemoryRestaurantRepository::new());
        let restaurant = service.create(testing::create_restaurant("joes-diner")).await.unwrap();

        let updated = service
            .set_images(restaurant.id, None, Some(vec![1, 2, 3]))
            .await
            .unwrap();

        assert!(updated.logo_url.is_none());
        assert_eq!(
            updated.banner_url.as_deref(),
            Some(format!("memory://restaurants/restaurants_{}_banner", restaurant.id).as_str())
        );
        assert_eq!(storage.len().await, 1);
        assert_eq!(service.get(restaurant.id).await.unwrap().banner_url, updated.banner_url);
    }

    #[tokio::test]
    async fn test_set_images_requires_a_file() {
        let (service, _) = service_with(InMemoryRestaurantRepository::new());
        let result = service.set_images(Uuid::now_v7(), None, None).await;
        assert!(matches!(result, Err(MenuError::Validation(_))));
    }

    #[tokio::test]
    async fn test_set_images_discards_blobs_when_update_fails() {
        let existing = Restaurant::new(testing::create_restaurant("joes-diner"));
        let id = existing.id;

        let mut repository = MockRestaurantRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository
            .expect_update()
            .returning(|_| Err(DatabaseError::Generic("connection reset".into()).into()));
        let (service, storage) = service_with(repository);

        let result = service.set_images(id, Some(vec![1]), Some(vec![2])).await;

        assert!(matches!(result, Err(MenuError::Persistence(_))));
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_storage_failure_propagates() {
        let existing = Restaurant::new(testing::create_restaurant("joes-diner"));
        let id = existing.id;

        let mut repository = MockRestaurantRepository::new();
        repository
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_update().never();

        let mut storage = testing::FailingStorage::default();
        storage.fail_saves = true;
        let service = RestaurantService::new(
            Arc::new(repository),
            Arc::new(storage),
            Arc::new(TracingEventSink),
        );

        let result = service.set_images(id, Some(vec![1]), None).await;
        assert!(matches!(result, Err(MenuError::Storage(StorageError::Io(_)))));
    }

    #[tokio::test]
    async fn test_events_are_published_after_writes() {
        let mut sink = MockEventSink::new();
        sink.expect_publish()
            .withf(|events: &Vec<DomainEvent>| {
                events.len() == 1 && events[0].name() == "restaurant.created"
            })
            .times(1)
            .return_const(());
        sink.expect_publish()
            .withf(|events: &Vec<DomainEvent>| {
                events.len() == 1 && events[0].name() == "restaurant.deleted"
            })
            .times(1)
            .return_const(());

        let service = RestaurantService::new(
            Arc::new(InMemoryRestaurantRepository::new()),
            Arc::new(InMemoryStorage::new()),
            Arc::new(sink),
        );
        let restaurant = service.create(testing::create_restaurant("joes-diner")).await.unwrap();
        service.delete(restaurant.id).await.unwrap();
    }
}
