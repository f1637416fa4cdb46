//! # Axum Helpers
//!
//! Shared HTTP plumbing for the menu services.
//!
//! - **[`server`]**: router assembly, health checks, graceful shutdown
//! - **[`http`]**: CORS policy and security headers
//! - **[`errors`]**: [`AppError`] and the JSON error body with numeric codes
//! - **[`extractors`]**: UUID/typed paths, validated JSON, list queries, picture uploads
//! - **[`audit`]**: audit trail for writes
//!
//! ```ignore
//! let api_routes = Router::new().nest("/dishes", dishes::router(service));
//! let router = create_router::<ApiDoc>(api_routes, RouterOptions::default())?;
//! create_production_app(router, &ServerConfig::default(), Duration::from_secs(30), async {}).await?;
//! ```

pub mod audit;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use server::{
    HealthCheckFuture, HealthResponse, OPENAPI_JSON_PATH, RouterOptions, ShutdownSignal,
    close_postgres, create_production_app, create_router, health_router, run_health_checks,
    shutdown_signal,
};

pub use http::{CorsPolicy, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse};

pub use extractors::{
    ApiPath, ImageFiles, ListParams, ListQuery, SingleFile, UploadedFile, UuidPath, ValidatedJson,
};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
