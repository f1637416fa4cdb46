//! Dishes: the building blocks of meal boxes.

pub mod entity;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use models::{CreateDish, Dish, DishType, UpdateDish};
pub use postgres::PgDishRepository;
pub use repository::{DishRepository, InMemoryDishRepository};
pub use service::DishService;
