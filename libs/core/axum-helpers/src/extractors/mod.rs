//! Custom extractors for Axum handlers.
//!
//! Every rejection is an [`crate::AppError`], so malformed requests get the
//! same JSON error body as domain failures.

pub mod list_query;
pub mod path;
pub mod upload;
pub mod validated_json;

pub use list_query::{ListParams, ListQuery};
pub use path::{ApiPath, UuidPath};
pub use upload::{
    ALLOWED_IMAGE_TYPES, FileUpload, ImageFiles, ImagesUpload, MAX_UPLOAD_BYTES, SingleFile,
    UPLOAD_BODY_LIMIT, UploadedFile,
};
pub use validated_json::ValidatedJson;
