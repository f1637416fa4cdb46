use axum::http::{HeaderValue, Method, header};
use std::io;
use std::time::Duration;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CorsPolicy {
    /// No cross-origin access
    #[default]
    Disabled,
    /// Any origin; development only
    Permissive,
    Origins(Vec<String>),
}

impl CorsPolicy {
    /// Policy from a comma-separated `CORS_ALLOWED_ORIGIN` value.
    ///
    /// A blank value falls back to [`CorsPolicy::Permissive`] when
    /// `permissive_when_empty` is set, [`CorsPolicy::Disabled`] otherwise.
    pub fn from_origins(raw: &str, permissive_when_empty: bool) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        match (origins.is_empty(), permissive_when_empty) {
            (false, _) => CorsPolicy::Origins(origins),
            (true, true) => CorsPolicy::Permissive,
            (true, false) => CorsPolicy::Disabled,
        }
    }

    pub fn into_layer(self) -> io::Result<CorsLayer> {
        match self {
            CorsPolicy::Disabled => Ok(CorsLayer::new()),
            CorsPolicy::Permissive => Ok(CorsLayer::permissive()),
            CorsPolicy::Origins(origins) => {
                let values = origins
                    .iter()
                    .map(|origin| origin.parse::<HeaderValue>())
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| {
                        io::Error::new(
                            io::ErrorKind::InvalidInput,
                            format!("Invalid CORS_ALLOWED_ORIGIN value: {}", e),
                        )
                    })?;
                Ok(create_cors_layer(AllowOrigin::list(values)))
            }
        }
    }
}

/// CORS layer for the given origins with the methods and headers the API uses.
pub fn create_cors_layer(allowed_origin: impl Into<AllowOrigin>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_from_origins() {
        assert_eq!(
            CorsPolicy::from_origins("http://localhost:3000, https://menu.example.com", false),
            CorsPolicy::Origins(vec![
                "http://localhost:3000".to_string(),
                "https://menu.example.com".to_string()
            ])
        );
        assert_eq!(CorsPolicy::from_origins(" , ", true), CorsPolicy::Permissive);
        assert_eq!(CorsPolicy::from_origins("", false), CorsPolicy::Disabled);
    }

    #[test]
    fn test_invalid_origin_is_an_error() {
        let policy = CorsPolicy::Origins(vec!["bad\norigin".to_string()]);
        assert!(policy.into_layer().is_err());
    }
}
