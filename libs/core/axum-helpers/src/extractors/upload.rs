//! Multipart image uploads.

use crate::errors::AppError;
use axum::extract::{FromRequest, Multipart, Request};
use utoipa::ToSchema;

/// Largest accepted image, in bytes
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Request body limit: room for a logo and a banner plus multipart framing
pub const UPLOAD_BODY_LIMIT: usize = 2 * MAX_UPLOAD_BYTES + 64 * 1024;

pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Checks content type and size of one multipart field.
    pub fn image(
        field: &str,
        file_name: Option<String>,
        content_type: Option<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, AppError> {
        let content_type = content_type.ok_or_else(|| {
            AppError::InvalidUpload(format!("field '{}' has no content type", field))
        })?;
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::InvalidUpload(format!(
                "content type '{}' is not allowed; expected one of {}",
                content_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            )));
        }
        if bytes.is_empty() {
            return Err(AppError::InvalidUpload(format!("field '{}' is empty", field)));
        }
        if bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::InvalidUpload(format!(
                "field '{}' is {} bytes; the limit is {}",
                field,
                bytes.len(),
                MAX_UPLOAD_BYTES
            )));
        }

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }
}

/// Multipart body with one image in the `file` field. Other fields are ignored.
pub struct SingleFile(pub UploadedFile);

pub const FILE_FIELD: &str = "file";

impl<S> FromRequest<S> for SingleFile
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;
        while let Some(field) = multipart.next_field().await? {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?.to_vec();
            return UploadedFile::image(FILE_FIELD, file_name, content_type, bytes).map(SingleFile);
        }
        Err(AppError::InvalidUpload(format!(
            "multipart field '{}' is required",
            FILE_FIELD
        )))
    }
}

/// Multipart body with optional `logo` and `banner` images.
pub struct ImageFiles {
    pub logo: Option<UploadedFile>,
    pub banner: Option<UploadedFile>,
}

impl<S> FromRequest<S> for ImageFiles
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut multipart = Multipart::from_request(req, state).await?;
        let mut files = ImageFiles {
            logo: None,
            banner: None,
        };

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let slot = match name.as_str() {
                "logo" => &mut files.logo,
                "banner" => &mut files.banner,
                _ => continue,
            };
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let bytes = field.bytes().await?.to_vec();
            *slot = Some(UploadedFile::image(&name, file_name, content_type, bytes)?);
        }

        Ok(files)
    }
}

/// OpenAPI shape of a [`SingleFile`] body
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct FileUpload {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// OpenAPI shape of an [`ImageFiles`] body
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImagesUpload {
    #[schema(value_type = Option<String>, format = Binary)]
    logo: Option<Vec<u8>>,
    #[schema(value_type = Option<String>, format = Binary)]
    banner: Option<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_types() {
        for content_type in ALLOWED_IMAGE_TYPES {
            let file = UploadedFile::image(
                "file",
                Some("a".into()),
                Some(content_type.into()),
                vec![1, 2, 3],
            )
            .unwrap();
            assert_eq!(file.bytes.len(), 3);
        }
    }

    #[test]
    fn test_rejects_other_types_and_missing_type() {
        assert!(matches!(
            UploadedFile::image("file", None, Some("image/gif".into()), vec![1]),
            Err(AppError::InvalidUpload(_))
        ));
        assert!(matches!(
            UploadedFile::image("file", None, None, vec![1]),
            Err(AppError::InvalidUpload(_))
        ));
    }

    #[test]
    fn test_rejects_empty_and_oversized() {
        assert!(UploadedFile::image("file", None, Some("image/png".into()), vec![]).is_err());
        let big = vec![0u8; MAX_UPLOAD_BYTES + 1];
        assert!(UploadedFile::image("file", None, Some("image/png".into()), big).is_err());
        let exact = vec![0u8; MAX_UPLOAD_BYTES];
        assert!(UploadedFile::image("file", None, Some("image/png".into()), exact).is_ok());
    }
}
