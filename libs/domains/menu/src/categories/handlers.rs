use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    ApiPath, AuditEvent, AuditOutcome, ListParams, ListQuery, SingleFile, UuidPath, ValidatedJson,
    errors::responses::{
        BadRequestQueryResponse, BadRequestUploadResponse, BadRequestUuidResponse,
        BadRequestValidationResponse, ConflictResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    extractors::FileUpload,
};
use database::{Page, PageMeta};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use super::models::{Category, CreateCategory, ReorderTarget, UpdateCategory};
use super::service::CategoryService;
use crate::error::MenuResult;

pub const TAG: &str = "categories";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_categories,
        create_category,
        get_category,
        update_category,
        delete_category,
        upload_category_picture,
        delete_category_picture,
        activate_category,
        deactivate_category,
        set_category_priority,
        swap_category_priority,
    ),
    components(
        schemas(Category, CreateCategory, UpdateCategory, PageMeta, Page<Category>, FileUpload),
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
        (name = TAG, description = "Menu section endpoints")
    )
)]
pub struct ApiDoc;

/// Documents [`by_restaurant_router`]; nest it under the restaurants path.
#[derive(OpenApi)]
#[openapi(paths(restaurant_categories), components(schemas(Category)))]
pub struct ByRestaurantApiDoc;

pub fn router(service: CategoryService) -> Router {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route(
            "/{id}/picture",
            post(upload_category_picture).delete(delete_category_picture),
        )
        .route("/{id}/activate", post(activate_category))
        .route("/{id}/deactivate", post(deactivate_category))
        .route("/{id}/reorder/priority/{priority}", post(set_category_priority))
        .route("/{id}/reorder/swap/{swap_id}", post(swap_category_priority))
        .with_state(Arc::new(service))
}

/// Routes nested under `/restaurants`
pub fn by_restaurant_router(service: CategoryService) -> Router {
    Router::new()
        .route("/{id}/categories", get(restaurant_categories))
        .with_state(Arc::new(service))
}

/// List menu sections of one restaurant
///
/// `?restaurant_id=<uuid>` is required.
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListParams),
    responses(
        (status = 200, description = "Page of categories", body = Page<Category>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    ListQuery(args): ListQuery,
) -> MenuResult<Json<Page<Category>>> {
    Ok(Json(service.list(&args).await?))
}

/// Create a category
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateCategory,
    responses(
        (status = 201, description = "Category created", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_category(
    State(service): State<Arc<CategoryService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateCategory>,
) -> MenuResult<impl IntoResponse> {
    let category = service.create(input).await?;

    AuditEvent::new(
        "category.create",
        Some(format!("category:{}", category.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({ "restaurant_id": category.restaurant_id, "name": category.name }))
    .log();

    Ok((StatusCode::CREATED, Json(category)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category found", body = Category),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_category(
    State(service): State<Arc<CategoryService>>,
    UuidPath(id): UuidPath,
) -> MenuResult<Json<Category>> {
    Ok(Json(service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body = UpdateCategory,
    responses(
        (status = 200, description = "Category updated", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_category(
    State(service): State<Arc<CategoryService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateCategory>,
) -> MenuResult<Json<Category>> {
    let category = service.update(id, input).await?;

    AuditEvent::new(
        "category.update",
        Some(format!("category:{}", id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .log();

    Ok(Json(category))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 204, description = "Category deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category(
    State(service): State<Arc<CategoryService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> MenuResult<impl IntoResponse> {
    service.delete(id).await?;

    AuditEvent::new(
        "category.delete",
        Some(format!("category:{}", id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .log();

    Ok(StatusCode::NO_CONTENT)
}

/// Upload or replace the category picture
#[utoipa::path(
    post,
    path = "/{id}/picture",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    request_body(content = FileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Picture stored", body = Category),
        (status = 400, response = BadRequestUploadResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_category_picture(
    State(service): State<Arc<CategoryService>>,
    UuidPath(id): UuidPath,
    SingleFile(file): SingleFile,
) -> MenuResult<Json<Category>> {
    Ok(Json(service.set_picture(id, file.bytes).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}/picture",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Picture removed", body = Category),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_category_picture(
    State(service): State<Arc<CategoryService>>,
    UuidPath(id): UuidPath,
) -> MenuResult<Json<Category>> {
    Ok(Json(service.delete_picture(id).await?))
}

#[utoipa::path(
    post,
    path = "/{id}/activate",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category active", body = Category),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn activate_category(
    State(service): State<Arc<CategoryService>>,
    UuidPath(id): UuidPath,
) -> MenuResult<Json<Category>> {
    Ok(Json(service.activate(id).await?))
}

#[utoipa::path(
    post,
    path = "/{id}/deactivate",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category inactive", body = Category),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn deactivate_category(
    State(service): State<Arc<CategoryService>>,
    UuidPath(id): UuidPath,
) -> MenuResult<Json<Category>> {
    Ok(Json(service.deactivate(id).await?))
}

/// Move a category to an explicit priority
#[utoipa::path(
    post,
    path = "/{id}/reorder/priority/{priority}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        ("priority" = i32, Path, description = "New priority, 0 or greater")
    ),
    responses(
        (status = 200, description = "Category reordered", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn set_category_priority(
    State(service): State<Arc<CategoryService>>,
    ApiPath((id, priority)): ApiPath<(Uuid, i32)>,
) -> MenuResult<Json<Category>> {
    Ok(Json(service.reorder(id, ReorderTarget::Priority(priority)).await?))
}

/// Exchange priorities with another category of the same restaurant
#[utoipa::path(
    post,
    path = "/{id}/reorder/swap/{swap_id}",
    tag = TAG,
    params(
        ("id" = Uuid, Path, description = "Category ID"),
        ("swap_id" = Uuid, Path, description = "Category to swap with")
    ),
    responses(
        (status = 200, description = "Priorities swapped", body = Category),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse)
    )
)]
async fn swap_category_priority(
    State(service): State<Arc<CategoryService>>,
    ApiPath((id, swap_id)): ApiPath<(Uuid, Uuid)>,
) -> MenuResult<Json<Category>> {
    Ok(Json(service.reorder(id, ReorderTarget::SwapWith(swap_id)).await?))
}

/// Menu sections of a restaurant in display order
#[utoipa::path(
    get,
    path = "/{id}/categories",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Restaurant ID")),
    responses(
        (status = 200, description = "Categories ordered by priority", body = Vec<Category>),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn restaurant_categories(
    State(service): State<Arc<CategoryService>>,
    UuidPath(id): UuidPath,
) -> MenuResult<Json<Vec<Category>>> {
    Ok(Json(service.categories_of(id).await?))
}
