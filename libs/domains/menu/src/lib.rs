//! Menu catalog domain: restaurants, their categories, dishes and products.
//!
//! Each aggregate lives in its own module with the same layers:
//!
//! ```text
//! handlers    ← axum router + OpenAPI paths
//! service     ← use cases: validation, uniqueness, references, pictures
//! repository  ← trait + in-memory implementation
//! postgres    ← SeaORM implementation over database::SoftDeleteRepository
//! entity      ← SeaORM model and conversions
//! models      ← aggregate, DTOs, enums
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use block_storage::InMemoryStorage;
//! use domain_menu::{InMemoryRestaurantRepository, RestaurantService, TracingEventSink};
//! use domain_menu::restaurants::handlers;
//!
//! let service = RestaurantService::new(
//!     Arc::new(InMemoryRestaurantRepository::new()),
//!     Arc::new(InMemoryStorage::new()),
//!     Arc::new(TracingEventSink),
//! );
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod categories;
pub mod dishes;
pub mod error;
pub mod events;
pub mod products;
pub mod restaurants;

pub(crate) mod pictures;

#[cfg(test)]
pub(crate) mod testing;

pub use categories::{
    Category, CategoryRepository, CategoryService, InMemoryCategoryRepository,
    PgCategoryRepository,
};
pub use dishes::{Dish, DishRepository, DishService, DishType, InMemoryDishRepository, PgDishRepository};
pub use error::{AggregateKind, MenuError, MenuResult};
pub use events::{DomainEvent, EventAction, EventSink, TracingEventSink};
pub use products::{
    InMemoryProductRepository, PgProductRepository, Product, ProductRepository, ProductService,
};
pub use restaurants::{
    InMemoryRestaurantRepository, PgRestaurantRepository, Restaurant, RestaurantRepository,
    RestaurantService,
};
