//! Postgres integration tests for the menu repositories
//!
//! Each test starts its own container through `test_utils::TestDatabase`
//! and runs the real migrations, so the partial unique indexes, the
//! `dish_type` enum and the decimal columns are exercised as deployed.

use block_storage::InMemoryStorage;
use database::FindArgs;
use domain_menu::categories::{CreateCategory, ReorderTarget};
use domain_menu::dishes::CreateDish;
use domain_menu::products::{CreateProduct, DishTypeMap, UpdateProduct};
use domain_menu::restaurants::CreateRestaurant;
use domain_menu::restaurants::models::{Address, Settings};
use domain_menu::*;
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use std::str::FromStr;
use std::sync::Arc;
use test_utils::{TestDataBuilder, TestDatabase, assertions::*};

struct Services {
    restaurants: RestaurantService,
    categories: CategoryService,
    dishes: DishService,
    products: ProductService,
    restaurant_repository: Arc<PgRestaurantRepository>,
}

fn services(db: DatabaseConnection) -> Services {
    let restaurant_repository = Arc::new(PgRestaurantRepository::new(db.clone()));
    let category_repository = Arc::new(PgCategoryRepository::new(db.clone()));
    let storage = Arc::new(InMemoryStorage::new());
    let events = Arc::new(TracingEventSink);

    Services {
        restaurants: RestaurantService::new(
            restaurant_repository.clone(),
            storage.clone(),
            events.clone(),
        ),
        categories: CategoryService::new(
            category_repository.clone(),
            restaurant_repository.clone(),
            storage.clone(),
            events.clone(),
        ),
        dishes: DishService::new(
            Arc::new(PgDishRepository::new(db.clone())),
            restaurant_repository.clone(),
            storage.clone(),
            events.clone(),
        ),
        products: ProductService::new(
            Arc::new(PgProductRepository::new(db)),
            category_repository,
            restaurant_repository.clone(),
            storage,
            events,
        ),
        restaurant_repository,
    }
}

fn new_restaurant(builder: &TestDataBuilder, n: u8) -> CreateRestaurant {
    CreateRestaurant {
        trade_name: builder.name("restaurant", "trade"),
        legal_name: builder.name("restaurant", "legal"),
        tax_id: builder.tax_id(n),
        phone: "+55 41 3333-0000".to_string(),
        whatsapp: String::new(),
        email: "owner@diner.example".to_string(),
        slug: builder.slug("diner"),
        address: Address {
            street: "Rua das Flores".to_string(),
            number: "42".to_string(),
            neighborhood: "Centro".to_string(),
            city: "Curitiba".to_string(),
            state: "PR".to_string(),
            country: "BR".to_string(),
            zip_code: "80000-000".to_string(),
            ..Address::default()
        },
        settings: Settings::default(),
    }
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_restaurant_crud_and_soft_delete() {
    let db = TestDatabase::new().await;
    let s = services(db.connection());
    let builder = TestDataBuilder::from_test_name("restaurant_crud");

    let created = s.restaurants.create(new_restaurant(&builder, 1)).await.unwrap();
    let fetched = s.restaurants.get(created.id).await.unwrap();
    assert_uuid_eq(fetched.id, created.id, "fetched restaurant");
    assert_eq!(fetched.slug, created.slug);
    assert_eq!(fetched.address, created.address);

    s.restaurants.delete(created.id).await.unwrap();
    assert!(matches!(
        s.restaurants.get(created.id).await,
        Err(MenuError::NotFound { .. })
    ));

    let page = s.restaurants.list(&FindArgs::default()).await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_unique_index_maps_to_already_exists() {
    let db = TestDatabase::new().await;
    let s = services(db.connection());
    let builder = TestDataBuilder::from_test_name("unique_index");

    let first = Restaurant::new(new_restaurant(&builder, 1));
    s.restaurant_repository.create(&first).await.unwrap();

    // Bypass the service check so the partial index itself rejects the row
    let mut second = Restaurant::new(new_restaurant(&builder, 2));
    second.slug = first.slug.clone();
    assert!(matches!(
        s.restaurant_repository.create(&second).await,
        Err(MenuError::AlreadyExists(_))
    ));

    // Soft-deleted rows no longer hold the slug
    s.restaurant_repository.delete(first.id).await.unwrap();
    s.restaurant_repository.create(&second).await.unwrap();
    let stored = assert_some(
        s.restaurant_repository.find_by_id(second.id).await.unwrap(),
        "restaurant reusing a deleted slug",
    );
    assert_eq!(stored.slug, first.slug);
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_category_order_swap_and_filters() {
    let db = TestDatabase::new().await;
    let s = services(db.connection());
    let builder = TestDataBuilder::from_test_name("category_swap");
    let restaurant = s.restaurants.create(new_restaurant(&builder, 1)).await.unwrap();

    let category = |name: &str, priority: i32| CreateCategory {
        restaurant_id: restaurant.id,
        name: name.to_string(),
        priority,
    };
    let sides = s.categories.create(category("Acompanhamentos", 3)).await.unwrap();
    let meals = s.categories.create(category("Marmitas", 1)).await.unwrap();

    let swapped = s
        .categories
        .reorder(meals.id, ReorderTarget::SwapWith(sides.id))
        .await
        .unwrap();
    assert_eq!(swapped.priority, 3);

    let ordered = s.categories.categories_of(restaurant.id).await.unwrap();
    let names: Vec<_> = ordered.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["Acompanhamentos", "Marmitas"]);

    let args = FindArgs::default().with_filter("restaurant_id", restaurant.id.to_string());
    assert_eq!(s.categories.list(&args).await.unwrap().meta.total_records, 2);

    let bad = FindArgs::default()
        .with_filter("restaurant_id", restaurant.id.to_string())
        .with_filter("priority", "high");
    assert!(matches!(
        s.categories.list(&bad).await,
        Err(MenuError::Persistence(_))
    ));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_dish_type_enum_filter() {
    let db = TestDatabase::new().await;
    let s = services(db.connection());
    let builder = TestDataBuilder::from_test_name("dish_filter");
    let restaurant = s.restaurants.create(new_restaurant(&builder, 1)).await.unwrap();

    for (name, dish_type) in [("Feijoada", DishType::Meat), ("Arroz", DishType::Accompaniment)] {
        s.dishes
            .create(CreateDish {
                restaurant_id: restaurant.id,
                name: name.to_string(),
                dish_type,
                add_on_price: Some(Decimal::from_str("4.50").unwrap()),
            })
            .await
            .unwrap();
    }

    let args = FindArgs::default().with_filter("dish_type", "accompaniment");
    let page = s.dishes.list(&args).await.unwrap();
    assert_eq!(page.meta.total_records, 1);
    assert_eq!(page.records[0].name, "Arroz");
    assert_eq!(page.records[0].add_on_price, Some(Decimal::from_str("4.50").unwrap()));
}

#[tokio::test]
#[ignore = "requires Docker"]
async fn test_product_prices_and_dish_type_map_persist() {
    let db = TestDatabase::new().await;
    let s = services(db.connection());
    let builder = TestDataBuilder::from_test_name("product_persist");
    let restaurant = s.restaurants.create(new_restaurant(&builder, 1)).await.unwrap();
    let category = s
        .categories
        .create(CreateCategory {
            restaurant_id: restaurant.id,
            name: "Marmitas".to_string(),
            priority: 0,
        })
        .await
        .unwrap();

    let dish_type_map = DishTypeMap::from([(DishType::Meat, 2), (DishType::SideDish, 1)]);
    let product = s
        .products
        .create(CreateProduct {
            restaurant_id: restaurant.id,
            category_id: category.id,
            name: "Marmita P".to_string(),
            description: "Arroz, feijao e carne".to_string(),
            sales_price: Decimal::from_str("24.90").unwrap(),
            cost_price: Decimal::from_str("1.10").unwrap(),
            dish_type_map: dish_type_map.clone(),
        })
        .await
        .unwrap();

    let fetched = s.products.get(product.id).await.unwrap();
    assert_eq!(fetched.sales_price, Decimal::from_str("24.90").unwrap());
    assert_eq!(fetched.dish_type_map, dish_type_map);

    let updated = s
        .products
        .update(
            product.id,
            UpdateProduct {
                sales_price: Some(Decimal::from_str("26.00").unwrap()),
                ..UpdateProduct::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.margin(), Decimal::from_str("24.90").unwrap());
}
