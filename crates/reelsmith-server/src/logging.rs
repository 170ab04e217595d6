//! Request logging middleware.

use std::time::Instant;

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::Response,
};

/// Log one line per request with method, path, status and latency.
pub async fn request_logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis();
    if status.is_server_error() {
        tracing::error!(%method, %path, %status, latency_ms, "request failed");
    } else {
        tracing::info!(%method, %path, %status, latency_ms, "request");
    }

    response
}
