use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// One log line per request with status and latency.
pub async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
    if response.status().is_server_error() {
        log::warn!("{method} {path} -> {} ({elapsed_ms:.1}ms)", response.status());
    } else {
        log::info!("{method} {path} -> {} ({elapsed_ms:.1}ms)", response.status());
    }
    response
}
