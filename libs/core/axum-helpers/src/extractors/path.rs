//! Path extractors that answer with the standard JSON error body.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use uuid::Uuid;

/// Single `{id}` path segment parsed as a UUID.
///
/// ```ignore
/// async fn get_dish(UuidPath(id): UuidPath) -> String {
///     format!("Dish {}", id)
/// }
///
/// let app = Router::new().route("/dishes/{id}", get(get_dish));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state).await?;
        Ok(UuidPath(Uuid::parse_str(&id)?))
    }
}

/// [`Path`] whose rejection is an [`AppError`], for multi-segment routes such
/// as `/categories/{id}/reorder/swap/{swap_id}`.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ApiPath(value))
    }
}
