//! Job board API - REST server
//!
//! Companies sign up and post jobs, students sign up and apply, admins list
//! everything and delete records with cascades. Every protected route group
//! sits behind a role guard that resolves the token in the configured header
//! to a live account.
//!
//! Author: hephaex@gmail.com

pub mod audit;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod requests;
pub mod routes;
pub mod services;
pub mod state;
pub mod validation;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method, StatusCode, Uri},
    middleware as axum_middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use jobboard_core::config::ServerConfig;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check))
        .route("/metrics", get(handlers::health::metrics))
        .route(
            "/metrics/prometheus",
            get(handlers::health::prometheus_metrics),
        )
        .nest("/api/v1", routes::api_routes(state.clone()))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback(route_not_found)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::metrics_middleware,
        ))
        .layer(axum_middleware::from_fn(
            middleware::security_headers_middleware,
        ))
        .layer(TraceLayer::new_for_http());

    if state.config.server.cors_enabled {
        router = router.layer(cors_layer(
            &state.config.server,
            &state.config.auth.token_header,
        ));
    }

    router.with_state(state)
}

async fn route_not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "API route not found",
            "route": uri.path(),
        })),
    )
}

/// Empty origin list allows any origin without credentials
fn cors_layer(server: &ServerConfig, token_header: &str) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    if server.cors_origins.is_empty() {
        return CorsLayer::new()
            .allow_methods(methods)
            .allow_headers(Any)
            .allow_origin(Any)
            .max_age(Duration::from_secs(600));
    }

    let mut allowed_headers = vec![header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN];
    match HeaderName::from_bytes(token_header.as_bytes()) {
        Ok(name) => allowed_headers.push(name),
        Err(e) => tracing::warn!(header = %token_header, error = %e, "Token header is not a valid header name"),
    }

    let origins: Vec<HeaderValue> = server
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_methods(methods)
        .allow_headers(allowed_headers)
        .allow_credentials(true)
        .allow_origin(origins)
        .max_age(Duration::from_secs(600))
}

/// Router over a fresh in-memory store
#[cfg(any(test, feature = "test-utils"))]
pub fn create_router_for_testing() -> Router {
    create_router(Arc::new(AppState::for_testing()))
}

/// Router over caller-provided state, so tests can seed the store first
#[cfg(any(test, feature = "test-utils"))]
pub fn create_router_with_state(state: Arc<AppState>) -> Router {
    create_router(state)
}
