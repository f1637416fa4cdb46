use axum::Router;
use domain_menu::{PgRestaurantRepository, RestaurantService, restaurants::handlers};
use std::sync::Arc;

pub fn router(state: &crate::state::AppState) -> Router {
    let repository = Arc::new(PgRestaurantRepository::new(state.db.clone()));
    let service = RestaurantService::new(repository, state.storage.clone(), state.events.clone());
    handlers::router(service)
}
