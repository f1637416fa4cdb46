use axum::Router;

pub mod categories;
pub mod dishes;
pub mod health;
pub mod products;
pub mod restaurants;

/// API version served by this binary
pub const VERSION_PREFIX: &str = "/v1";

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix will be added by the `create_router` helper.
///
/// Every sub-router has its state applied, so the result is stateless.
pub fn routes(state: &crate::state::AppState) -> Router {
    let v1 = Router::new()
        .nest(
            "/restaurants",
            restaurants::router(state).merge(categories::by_restaurant_router(state)),
        )
        .nest("/categories", categories::router(state))
        .nest("/dishes", dishes::router(state))
        .nest("/products", products::router(state));

    Router::new().nest(VERSION_PREFIX, v1)
}

/// `/ready` with real dependency checks; merged next to the stateless app router.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
