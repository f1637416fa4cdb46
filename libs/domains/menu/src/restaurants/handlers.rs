use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, put},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, ImageFiles, ListParams, ListQuery, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestQueryResponse, BadRequestUploadResponse, BadRequestUuidResponse,
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    extractors::ImagesUpload,
};
use database::{Page, PageMeta};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use super::models::{
    Address, CreateRestaurant, DeliverySettings, EcommerceSettings, OpeningHours,
    PostPaidSettings, Restaurant, RestaurantSummary, Settings, UpdateRestaurant, Weekday,
};
use super::service::RestaurantService;
use crate::error::MenuResult;

pub const TAG: &str = "restaurants";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_restaurants,
        create_restaurant,
        get_restaurant,
        update_restaurant,
        delete_restaurant,
        set_restaurant_images,
    ),
    components(
        schemas(
            Restaurant, RestaurantSummary, CreateRestaurant, UpdateRestaurant, Address, Settings,
            DeliverySettings, EcommerceSettings, PostPaidSettings, OpeningHours, Weekday,
            PageMeta, Page<RestaurantSummary>, ImagesUpload
        ),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestUuidResponse,
            BadRequestQueryResponse,
            BadRequestUploadResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Restaurant management endpoints")
    )
)]
pub struct ApiDoc;

pub fn router(service: RestaurantService) -> Router {
    Router::new()
        .route("/", get(list_restaurants).post(create_restaurant))
        .route(
            "/{id}",
            get(get_restaurant)
                .put(update_restaurant)
                .delete(delete_restaurant),
        )
        .route("/{id}/images", put(set_restaurant_images))
        .with_state(Arc::new(service))
}

/// List restaurant summaries
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListParams),
    responses(
        (status = 200, description = "Page of restaurants", body = Page<RestaurantSummary>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_restaurants(
    State(service): State<Arc<RestaurantService>>,
    ListQuery(args): ListQuery,
) -> MenuResult<Json<Page<RestaurantSummary>>> {
    Ok(Json(service.list(&args).await?))
}

/// Create a restaurant
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateRestaurant,
    responses(
        (status = 201, description = "Restaurant created", body = Restaurant),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_restaurant(
    State(service): State<Arc<RestaurantService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateRestaurant>,
) -> MenuResult<impl IntoResponse> {
    let restaurant = service.create(input).await?;

    AuditEvent::new(
        "restaurant.create",
        Some(format!("restaurant:{}", restaurant.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({ "slug": restaurant.slug }))
    .log();

    Ok((StatusCode::CREATED, Json(restaurant)))
}

/// Get a restaurant by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Restaurant found", body = Restaurant),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_restaurant(
    State(service): State<Arc<RestaurantService>>,
    UuidPath(id): UuidPath,
) -> MenuResult<Json<Restaurant>> {
    Ok(Json(service.get(id).await?))
}

/// Update a restaurant; absent fields are kept
#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    request_body = UpdateRestaurant,
    responses(
        (status = 200, description = "Restaurant updated", body = Restaurant),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_restaurant(
    State(service): State<Arc<RestaurantService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateRestaurant>,
) -> MenuResult<Json<Restaurant>> {
    let restaurant = service.update(id, input).await?;

    AuditEvent::new(
        "restaurant.update",
        Some(format!("restaurant:{}", id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .log();

    Ok(Json(restaurant))
}

/// Soft-delete a restaurant
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 204, description = "Restaurant deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_restaurant(
    State(service): State<Arc<RestaurantService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> MenuResult<impl IntoResponse> {
    service.delete(id).await?;

    AuditEvent::new(
        "restaurant.delete",
        Some(format!("restaurant:{}", id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Upload a logo and/or a banner
#[utoipa::path(
    put,
    path = "/{id}/images",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    request_body(content = ImagesUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Images stored", body = Restaurant),
        (status = 400, response = BadRequestUploadResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn set_restaurant_images(
    State(service): State<Arc<RestaurantService>>,
    UuidPath(id): UuidPath,
    files: ImageFiles,
) -> MenuResult<Json<Restaurant>> {
    let restaurant = service
        .set_images(
            id,
            files.logo.map(|file| file.bytes),
            files.banner.map(|file| file.bytes),
        )
        .await?;
    Ok(Json(restaurant))
}
