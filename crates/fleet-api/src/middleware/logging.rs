//! Request/response logging middleware.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

/// Logs request method, path, status, and duration.
///
/// Server errors log at `error`, client errors at `warn`.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis() as u64;
    let status = response.status();

    if status.is_server_error() {
        error!(method = %method, path = %uri.path(), status = status.as_u16(), duration_ms, "HTTP request");
    } else if status.is_client_error() {
        warn!(method = %method, path = %uri.path(), status = status.as_u16(), duration_ms, "HTTP request");
    } else {
        info!(method = %method, path = %uri.path(), status = status.as_u16(), duration_ms, "HTTP request");
    }

    response
}
