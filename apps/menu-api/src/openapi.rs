use domain_menu::{categories, dishes, products, restaurants};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Menu API",
        version = "0.1.0",
        description = "Restaurants and their menus: categories, dishes and products"
    ),
    servers(
        (url = "/api", description = "API base path")
    ),
    nest(
        (path = "/v1/restaurants", api = restaurants::handlers::ApiDoc),
        (path = "/v1/restaurants", api = categories::handlers::ByRestaurantApiDoc),
        (path = "/v1/categories", api = categories::handlers::ApiDoc),
        (path = "/v1/dishes", api = dishes::handlers::ApiDoc),
        (path = "/v1/products", api = products::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_versioned_paths() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        for expected in [
            "/v1/restaurants",
            "/v1/restaurants/{id}",
            "/v1/restaurants/{id}/categories",
            "/v1/categories/{id}/reorder/swap/{swap_id}",
            "/v1/dishes/{id}/picture",
            "/v1/products",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}: {paths:?}");
        }
    }
}
