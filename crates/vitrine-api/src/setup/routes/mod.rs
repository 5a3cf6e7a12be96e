//! Route configuration and setup.

mod health;

use crate::auth::middleware::auth_middleware;
use crate::constants::{API_PREFIX, MULTIPART_OVERHEAD_BYTES};
use crate::error::ErrorResponse;
use crate::handlers;
use crate::middleware::request_id_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use vitrine_core::Config;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    let protected = protected_routes().layer(axum::middleware::from_fn_with_state(
        state.jwt.clone(),
        auth_middleware,
    ));

    let body_limit = usize::try_from(config.max_upload_bytes())
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    tracing::info!(body_limit, "Request body limit configured");

    let app = public_routes()
        .merge(protected)
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(DefaultBodyLimit::disable())
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

fn api(path: &str) -> String {
    format!("{}{}", API_PREFIX, path)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .route(&api("/login"), post(handlers::auth::login))
        .route(&api("/gallery"), get(handlers::gallery::list_gallery))
        .route(&api("/files/{*path}"), get(handlers::files::serve_file))
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(&api("/me"), get(handlers::auth::me))
        .route(&api("/media"), get(handlers::media_get::list_media))
        .route(
            &api("/media/upload"),
            post(handlers::media_upload::upload_media),
        )
        .route(&api("/media/sort"), post(handlers::media_sort::sort_media))
        .route(
            &api("/media/{id}"),
            get(handlers::media_get::get_media)
                .put(handlers::media_update::update_media)
                .delete(handlers::media_delete::delete_media),
        )
        .route(
            &api("/media/{id}/replace"),
            put(handlers::media_replace::replace_media),
        )
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn panic_response(panic: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new("Internal server error", "INTERNAL_ERROR")),
    )
        .into_response()
}
