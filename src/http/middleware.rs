//! Request logging
//!
//! One structured line per request: method, path, status, latency and the
//! declared request and response sizes.

use axum::{
    body::Body,
    http::{header, HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Paths polled by load balancers and monitors; logged at debug only
const POLLED_PATHS: &[&str] = &["/health", "/version"];

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Request logging middleware
pub async fn request_logger(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let request_bytes = content_length(request.headers()).unwrap_or(0);
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();
    let response_bytes = content_length(response.headers());

    if POLLED_PATHS.contains(&path.as_str()) && response.status().is_success() {
        debug!(%method, %path, status, elapsed_ms, "poll");
    } else if response.status().is_success() {
        info!(%method, %path, status, elapsed_ms, request_bytes, ?response_bytes, "request");
    } else if response.status().is_client_error() {
        warn!(%method, %path, status, elapsed_ms, request_bytes, "request rejected");
    } else {
        error!(%method, %path, status, elapsed_ms, request_bytes, "request failed");
    }

    response
}
