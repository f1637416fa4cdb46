use axum::Router;
use domain_menu::{
    PgCategoryRepository, PgProductRepository, PgRestaurantRepository, ProductService,
    products::handlers,
};
use std::sync::Arc;

pub fn router(state: &crate::state::AppState) -> Router {
    let service = ProductService::new(
        Arc::new(PgProductRepository::new(state.db.clone())),
        Arc::new(PgCategoryRepository::new(state.db.clone())),
        Arc::new(PgRestaurantRepository::new(state.db.clone())),
        state.storage.clone(),
        state.events.clone(),
    );
    handlers::router(service)
}
