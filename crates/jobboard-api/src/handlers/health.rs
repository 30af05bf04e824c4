//! Health check and metrics handlers
//!
//! Author: hephaex@gmail.com

use std::fmt::Write as _;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use jobboard_core::StoreBackend;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build_info: BuildInfo,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BuildInfo {
    pub name: String,
    pub rust_version: String,
}

/// Liveness check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_info: BuildInfo {
            name: env!("CARGO_PKG_NAME").to_string(),
            rust_version: "1.75+".to_string(),
        },
    })
}

/// Readiness response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: ReadinessChecks,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReadinessChecks {
    /// Store answered a lookup
    pub store: bool,
    /// Backend in use (`surrealdb` or `memory`)
    pub store_backend: String,
    /// Tokens are signed with a configured secret rather than the development one
    pub signing_secret_configured: bool,
}

/// Readiness check against the store
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready", body = ReadinessResponse),
        (status = 503, description = "Service not ready", body = ReadinessResponse)
    )
)]
pub async fn readiness_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let store_ok = match state.store.list_companies().await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness store check failed");
            false
        }
    };

    let store_backend = match state.config.database.backend {
        StoreBackend::SurrealDb => "surrealdb",
        StoreBackend::Memory => "memory",
    };

    let ready = state.is_ready() && store_ok;
    let response = ReadinessResponse {
        ready,
        checks: ReadinessChecks {
            store: store_ok,
            store_backend: store_backend.to_string(),
            signing_secret_configured: !state.config.auth.uses_development_secret(),
        },
    };

    if ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// JSON metrics response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MetricsResponse {
    pub uptime_seconds: u64,
    pub total_requests: u64,
    pub requests_per_second: f64,
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "health",
    responses(
        (status = 200, description = "Request totals", body = MetricsResponse)
    )
)]
pub async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.uptime_secs();
    let total_requests = state.get_request_count();
    let rps = if uptime > 0 {
        total_requests as f64 / uptime as f64
    } else {
        0.0
    };

    Json(MetricsResponse {
        uptime_seconds: uptime,
        total_requests,
        requests_per_second: rps,
    })
}

/// Prometheus-compatible metrics endpoint
pub async fn prometheus_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let uptime = state.uptime_secs();
    let total_requests = state.get_request_count();

    let mut output = String::new();

    output.push_str("# HELP jobboard_uptime_seconds Time since server start\n");
    output.push_str("# TYPE jobboard_uptime_seconds gauge\n");
    let _ = writeln!(output, "jobboard_uptime_seconds {uptime}\n");

    output.push_str("# HELP jobboard_requests_total Total number of HTTP requests\n");
    output.push_str("# TYPE jobboard_requests_total counter\n");
    let _ = writeln!(output, "jobboard_requests_total {total_requests}\n");

    output.push_str("# HELP jobboard_build_info Build information\n");
    output.push_str("# TYPE jobboard_build_info gauge\n");
    let _ = writeln!(
        output,
        "jobboard_build_info{{version=\"{}\"}} 1\n",
        env!("CARGO_PKG_VERSION")
    );

    let mut metrics: Vec<_> = state.metrics_snapshot().await.into_iter().collect();
    metrics.sort_by(|a, b| a.0.cmp(&b.0));

    output.push_str("# HELP jobboard_http_requests_total HTTP requests by endpoint and status\n");
    output.push_str("# TYPE jobboard_http_requests_total counter\n");
    for (endpoint, endpoint_metrics) in &metrics {
        let mut statuses: Vec<_> = endpoint_metrics.status_counts.iter().collect();
        statuses.sort();
        for (status, count) in statuses {
            let _ = writeln!(
                output,
                "jobboard_http_requests_total{{endpoint=\"{endpoint}\",status=\"{status}\"}} {count}"
            );
        }
    }
    output.push('\n');

    output.push_str("# HELP jobboard_http_request_duration_seconds HTTP request latency\n");
    output.push_str("# TYPE jobboard_http_request_duration_seconds histogram\n");
    for (endpoint, endpoint_metrics) in &metrics {
        if endpoint_metrics.latency_count == 0 {
            continue;
        }

        let buckets = &endpoint_metrics.buckets;
        let mut cumulative = 0u64;
        for (le, count) in [
            ("0.01", buckets.under_10ms),
            ("0.05", buckets.ms_10_50),
            ("0.1", buckets.ms_50_100),
            ("0.5", buckets.ms_100_500),
            ("1.0", buckets.ms_500_1000),
            ("+Inf", buckets.over_1s),
        ] {
            cumulative += count;
            let _ = writeln!(
                output,
                "jobboard_http_request_duration_seconds_bucket{{endpoint=\"{endpoint}\",le=\"{le}\"}} {cumulative}"
            );
        }

        let total_sum_s = endpoint_metrics.total_latency_us as f64 / 1_000_000.0;
        let _ = writeln!(
            output,
            "jobboard_http_request_duration_seconds_sum{{endpoint=\"{endpoint}\"}} {total_sum_s:.6}"
        );
        let _ = writeln!(
            output,
            "jobboard_http_request_duration_seconds_count{{endpoint=\"{endpoint}\"}} {}",
            endpoint_metrics.latency_count
        );
    }

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        output,
    )
}
