use axum::Router;
use domain_menu::{DishService, PgDishRepository, PgRestaurantRepository, dishes::handlers};
use std::sync::Arc;

pub fn router(state: &crate::state::AppState) -> Router {
    let service = DishService::new(
        Arc::new(PgDishRepository::new(state.db.clone())),
        Arc::new(PgRestaurantRepository::new(state.db.clone())),
        state.storage.clone(),
        state.events.clone(),
    );
    handlers::router(service)
}
