//! Restaurants: the tenant every menu section, dish and product belongs to.

pub mod entity;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use models::{CreateRestaurant, Restaurant, RestaurantSummary, UpdateRestaurant};
pub use postgres::PgRestaurantRepository;
pub use repository::{InMemoryRestaurantRepository, RestaurantRepository};
pub use service::RestaurantService;
