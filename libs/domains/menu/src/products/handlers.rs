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

use super::models::{CreateProduct, Product, UpdateProduct};
use super::service::ProductService;
use crate::dishes::DishType;
use crate::error::MenuResult;

pub const TAG: &str = "products";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        create_product,
        get_product,
        update_product,
        delete_product,
        upload_product_picture,
        delete_product_picture,
    ),
    components(
        schemas(Product, CreateProduct, UpdateProduct, DishType, PageMeta, Page<Product>, FileUpload),
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
        (name = TAG, description = "Product endpoints")
    )
)]
pub struct ApiDoc;

pub fn router(service: ProductService) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/{id}", get(get_product).put(update_product).delete(delete_product))
        .route(
            "/{id}/picture",
            post(upload_product_picture).delete(delete_product_picture),
        )
        .with_state(Arc::new(service))
}

#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    params(ListParams),
    responses(
        (status = 200, description = "Page of products", body = Page<Product>),
        (status = 400, response = BadRequestQueryResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products(
    State(service): State<Arc<ProductService>>,
    ListQuery(args): ListQuery,
) -> MenuResult<Json<Page<Product>>> {
    Ok(Json(service.list(&args).await?))
}

#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_product(
    State(service): State<Arc<ProductService>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateProduct>,
) -> MenuResult<impl IntoResponse> {
    let product = service.create(input).await?;

    AuditEvent::new(
        "product.create",
        Some(format!("product:{}", product.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({ "restaurant_id": product.restaurant_id, "category_id": product.category_id }))
    .log();

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product(
    State(service): State<Arc<ProductService>>,
    UuidPath(id): UuidPath,
) -> MenuResult<Json<Product>> {
    Ok(Json(service.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body = UpdateProduct,
    responses(
        (status = 200, description = "Product updated", body = Product),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product(
    State(service): State<Arc<ProductService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateProduct>,
) -> MenuResult<Json<Product>> {
    let product = service.update(id, input).await?;

    AuditEvent::new("product.update", Some(format!("product:{}", id)), AuditOutcome::Success)
        .with_request_headers(&headers)
        .log();

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestUuidResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product(
    State(service): State<Arc<ProductService>>,
    headers: HeaderMap,
    UuidPath(id): UuidPath,
) -> MenuResult<impl IntoResponse> {
    service.delete(id).await?;

    AuditEvent::new("product.delete", Some(format!("product:{}", id)), AuditOutcome::Success)
        .with_request_headers(&headers)
        .log();

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/picture",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    request_body(content = FileUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Picture stored", body = Product),
        (status = 400, response = BadRequestUploadResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn upload_product_picture(
    State(service): State<Arc<ProductService>>,
    UuidPath(id): UuidPath,
    SingleFile(file): SingleFile,
) -> MenuResult<Json<Product>> {
    Ok(Json(service.set_picture(id, file.bytes).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}/picture",
    tag = TAG,
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Picture removed", body = Product),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product_picture(
    State(service): State<Arc<ProductService>>,
    UuidPath(id): UuidPath,
) -> MenuResult<Json<Product>> {
    Ok(Json(service.delete_picture(id).await?))
}
