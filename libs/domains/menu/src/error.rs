use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use block_storage::StorageError;
use database::DatabaseError;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;
use uuid::Uuid;

/// The four aggregates of the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AggregateKind {
    Restaurant,
    Category,
    Dish,
    Product,
}

impl AggregateKind {
    /// Block storage bucket holding this aggregate's pictures
    pub fn bucket(&self) -> &'static str {
        match self {
            AggregateKind::Restaurant => "restaurants",
            AggregateKind::Category => "product_categories",
            AggregateKind::Dish => "dishes",
            AggregateKind::Product => "products",
        }
    }

    /// `<kind>_picture_<id>`
    pub fn picture_key(&self, id: Uuid) -> String {
        format!("{}_picture_{}", self, id)
    }
}

#[derive(Debug, Error)]
pub enum MenuError {
    #[error("{kind} {id} not found")]
    NotFound { kind: AggregateKind, id: Uuid },

    #[error("referenced {kind} {id} does not exist")]
    ReferenceNotFound { kind: AggregateKind, id: Uuid },

    #[error("{0}")]
    AlreadyExists(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Persistence error: {0}")]
    Persistence(DatabaseError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl MenuError {
    pub fn not_found(kind: AggregateKind, id: Uuid) -> Self {
        MenuError::NotFound { kind, id }
    }

    pub fn reference_not_found(kind: AggregateKind, id: Uuid) -> Self {
        MenuError::ReferenceNotFound { kind, id }
    }
}

pub type MenuResult<T> = Result<T, MenuError>;

/// Unique index violations surface as `AlreadyExists`, like the pre-write check.
impl From<DatabaseError> for MenuError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::UniqueViolation(detail) => MenuError::AlreadyExists(detail),
            other => MenuError::Persistence(other),
        }
    }
}

impl From<MenuError> for AppError {
    fn from(err: MenuError) -> Self {
        match err {
            e @ (MenuError::NotFound { .. } | MenuError::ReferenceNotFound { .. }) => {
                AppError::NotFound(e.to_string())
            }
            MenuError::AlreadyExists(msg) => AppError::Conflict(msg),
            MenuError::Validation(msg) => AppError::BadRequest(msg),
            MenuError::Persistence(e) => e.into(),
            MenuError::Storage(e) => AppError::Storage(e.to_string()),
        }
    }
}

impl IntoResponse for MenuError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
