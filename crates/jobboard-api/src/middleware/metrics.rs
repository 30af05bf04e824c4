//! Metrics tracking middleware
//!
//! Tracks request latency, counts, and status codes per endpoint.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Records status and latency of every request against its normalized path
pub async fn metrics_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let endpoint = normalize_endpoint(request.uri().path());

    let response = next.run(request).await;

    let latency_us = start.elapsed().as_micros() as u64;
    let status = response.status().as_u16();

    tokio::spawn(async move {
        state.record_request(endpoint, status, latency_us).await;
    });

    response
}

/// Replace record identifiers with `:id` so paths group by route
fn normalize_endpoint(path: &str) -> String {
    path.split('/')
        .map(|seg| {
            if is_uuid(seg) || is_numeric(seg) {
                ":id"
            } else {
                seg
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn is_uuid(s: &str) -> bool {
    uuid::Uuid::parse_str(s).is_ok()
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}
