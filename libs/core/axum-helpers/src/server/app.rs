use super::shutdown::ShutdownSignal;
use crate::errors::AppError;
use crate::errors::handlers::{not_found, panic_response};
use crate::extractors::UPLOAD_BODY_LIMIT;
use crate::http::{CorsPolicy, security_headers};
use axum::extract::{DefaultBodyLimit, Request, State};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

pub const OPENAPI_JSON_PATH: &str = "/api-docs/openapi.json";

/// Cross-cutting settings applied around the API routes.
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Upper bound for handling a single request
    pub route_timeout: Duration,
    pub cors: CorsPolicy,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            route_timeout: Duration::from_secs(30),
            cors: CorsPolicy::default(),
        }
    }
}

/// Creates the application router around already-stated API routes.
///
/// Sets up:
/// - Scalar docs at `/scalar` and the raw document at `/api-docs/openapi.json`
/// - API routes nested under `/api`
/// - JSON 404 fallback
/// - Per-request timeout answered with a JSON 408
/// - Panic recovery answered with a JSON 500
/// - Body limit sized for picture uploads, tracing, security headers, CORS, compression
///
/// # Errors
/// Returns an error when the CORS origin list contains values that are not
/// valid header values.
///
/// # Example
/// ```ignore
/// let api_routes = Router::new().nest("/restaurants", restaurants::router(service));
/// let router = create_router::<ApiDoc>(api_routes, RouterOptions::default())?;
/// ```
pub fn create_router<T>(apis: Router, options: RouterOptions) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_scalar::{Scalar, Servable as ScalarServable};

    let cors_layer = options.cors.into_layer()?;

    let router = Router::new()
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .route(OPENAPI_JSON_PATH, get(|| async { Json(T::openapi()) }))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(
            options.route_timeout,
            enforce_timeout,
        ))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

async fn enforce_timeout(State(limit): State<Duration>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(path = %path, timeout = ?limit, "Request timed out");
            AppError::RequestTimeout.into_response()
        }
    }
}

/// Serves `router` until SIGINT/SIGTERM, then runs `cleanup` bounded by
/// `shutdown_timeout`.
///
/// # Example
/// ```ignore
/// let cleanup = async move { close_postgres(db, "main").await };
/// create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let signal = ShutdownSignal::install();
    let cleanup_signal = signal.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let cleanup_handle = tokio::spawn(async move {
        cleanup_signal.triggered().await;

        info!("Starting cleanup tasks (timeout: {:?})", shutdown_timeout);
        match tokio::time::timeout(shutdown_timeout, cleanup).await {
            Ok(_) => info!("Cleanup completed successfully"),
            Err(_) => tracing::warn!(
                "Cleanup exceeded timeout of {:?}, forcing shutdown",
                shutdown_timeout
            ),
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(signal.triggered())
        .await
        .inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        });

    cleanup_handle.await.ok();

    serve_result
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request as HttpRequest, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[derive(OpenApi)]
    #[openapi(info(title = "test"))]
    struct TestDoc;

    fn api() -> Router {
        Router::new()
            .route("/ok", get(|| async { "ok" }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    "late"
                }),
            )
            .route(
                "/boom",
                get(|| async {
                    if true {
                        panic!("handler exploded");
                    }
                    "unreachable"
                }),
            )
    }

    fn options(timeout_ms: u64) -> RouterOptions {
        RouterOptions {
            route_timeout: Duration::from_millis(timeout_ms),
            cors: CorsPolicy::Disabled,
        }
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get_request(uri: &str) -> HttpRequest<Body> {
        HttpRequest::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_routes_are_nested_under_api() {
        let app = create_router::<TestDoc>(api(), options(1_000)).unwrap();
        let response = app.oneshot(get_request("/api/ok")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
    }

    #[tokio::test]
    async fn test_unknown_route_returns_json_404() {
        let app = create_router::<TestDoc>(api(), options(1_000)).unwrap();
        let response = app.oneshot(get_request("/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_slow_route_times_out_with_408() {
        let app = create_router::<TestDoc>(api(), options(20)).unwrap();
        let response = app.oneshot(get_request("/api/slow")).await.unwrap();
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(json_body(response).await["error"], "REQUEST_TIMEOUT");
    }

    #[tokio::test]
    async fn test_panic_is_answered_with_500() {
        let app = create_router::<TestDoc>(api(), options(1_000)).unwrap();
        let response = app.oneshot(get_request("/api/boom")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["error"], "PANIC");
        assert!(!body["message"].as_str().unwrap().contains("exploded"));
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = create_router::<TestDoc>(api(), options(1_000)).unwrap();
        let response = app.oneshot(get_request(OPENAPI_JSON_PATH)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["info"]["title"], "test");
    }
}
