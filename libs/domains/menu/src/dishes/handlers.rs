use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, ListParams, ListQuery, SingleFile, UuidPath, ValidatedJson,
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

use super::models::{CreateDish, Dish, DishType, UpdateDish};
use super::service::DishService;
use crate::error::MenuResult;

pub const TAG: &str = "dishes";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_dishes,
        create_dish,
        get_dish,
        update_dish,
        delete_dish,
        upload_dish_picture,
        delete_dish_picture,
    ),
    components(
        schemas(Dish, DishType, CreateDish, UpdateDish, PageMeta, Page<Dish>, FileUpload),
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
        (name = TAG, description = "Dish endpoints")
    )
)]
pub struct ApiDoc;

pub fn router(service: DishService) -> Router {
    Router::new()
        .route("/", get(list_dishes).post(create_dish))
        .route("/{id}", get(get_dish).put(update_dish).delete(delete_dish))
        .route(
            "/{id}/picture",
            post(upload_dish_picture).delete(delete_dish_picture),
        )
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListParams),
    responses(
        (status = 200, description = "Page of dishes", body = Page<Dish>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_dishes(
    State(service): State<Arc<DishService>>,
    ListQuery(args): ListQuery,
) -> MenuResult<Json<Page<Dish>>> {
    Ok(Json(service.list(&args).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateDish,
    responses(
        (status = 201, description = "Dish created", body = Dish),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_dish(
    State(service): State<Arc<DishService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateDish>,
) -> MenuResult<impl IntoResponse> {
    let dish = service.create(input).await?;

    AuditEvent::new(
        "dish.create",
        Some(format!("dish:{}", dish.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({ "restaurant_id": dish.restaurant_id, "dish_type": dish.dish_type }))
    .log();

    Ok((StatusCode::CREATED, Json(dish)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Dish ID")),
    responses(
        (status = 200, description = "Dish found", body = Dish),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_dish(
    State(service): State<Arc<DishService>>,
    UuidPath(id): UuidPath,
) -> MenuResult<Json<Dish>> {
    Ok(Json(service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Dish ID")),
    request_body = UpdateDish,
    responses(
        (status = 200, description = "Dish updated", body = Dish),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_dish(
    State(service): State<Arc<DishService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateDish>,
) -> MenuResult<Json<Dish>> {
    let dish = service.update(id, input).await?;

    AuditEvent::new("dish.update", Some(format!("dish:{}", id)), AuditOutcome::Success)
        .with_request_headers(&headers)
        .log();

    Ok(Json(dish))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Dish ID")),
    responses(
        (status = 204, description = "Dish deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_dish(
    State(service): State<Arc<DishService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> MenuResult<impl IntoResponse> {
    service.delete(id).await?;

    AuditEvent::new("dish.delete", Some(format!("dish:{}", id)), AuditOutcome::Success)
        .with_request_headers(&headers)
        .log();

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/picture",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Dish ID")),
    request_body(content = FileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Picture stored", body = Dish),
        (status = 400, response = BadRequestUploadResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_dish_picture(
    State(service): State<Arc<DishService>>,
    UuidPath(id): UuidPath,
    SingleFile(file): SingleFile,
) -> MenuResult<Json<Dish>> {
    Ok(Json(service.set_picture(id, file.bytes).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}/picture",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Dish ID")),
    responses(
        (status = 200, description = "Picture removed", body = Dish),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_dish_picture(
    State(service): State<Arc<DishService>>,
    UuidPath(id): UuidPath,
) -> MenuResult<Json<Dish>> {
    Ok(Json(service.delete_picture(id).await?))
}
