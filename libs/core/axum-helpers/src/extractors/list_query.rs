use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use database::FindArgs;
use utoipa::IntoParams;

/// Query string parsed into [`FindArgs`].
///
/// `limit`, `offset`, `sort_by` and `sort_asc` drive paging and ordering;
/// every other parameter becomes an equality filter.
/// `GET /dishes?restaurant_id=...&sort_by=name&limit=20`
pub struct ListQuery(pub FindArgs);

impl<S> FromRequestParts<S> for ListQuery
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<Vec<(String, String)>>::from_request_parts(parts, state).await?;
        Ok(ListQuery(FindArgs::from_query(params)?))
    }
}

/// OpenAPI shape of the reserved [`ListQuery`] parameters. Any other
/// parameter is an equality filter on the field of the same name.
#[derive(IntoParams)]
#[into_params(parameter_in = Query)]
#[allow(dead_code)]
pub struct ListParams {
    /// Page size; absent or 0 means unlimited
    limit: Option<i64>,
    /// Records to skip
    offset: Option<i64>,
    /// Field to order by, `id` by default
    sort_by: Option<String>,
    /// Ascending unless `false`
    sort_asc: Option<bool>,
}
