use axum::Router;
use domain_menu::{CategoryService, PgCategoryRepository, PgRestaurantRepository, categories::handlers};
use std::sync::Arc;

fn service(state: &crate::state::AppState) -> CategoryService {
    CategoryService::new(
        Arc::new(PgCategoryRepository::new(state.db.clone())),
        Arc::new(PgRestaurantRepository::new(state.db.clone())),
        state.storage.clone(),
        state.events.clone(),
    )
}

pub fn router(state: &crate::state::AppState) -> Router {
    handlers::router(service(state))
}

/// `GET /restaurants/{id}/categories`
pub fn by_restaurant_router(state: &crate::state::AppState) -> Router {
    handlers::by_restaurant_router(service(state))
}
