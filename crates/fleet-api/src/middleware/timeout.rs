//! Per-request deadline.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use fleet_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Answer 408 when the inner stack does not finish within
/// `server.request_timeout_seconds`.
pub async fn request_timeout(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let limit = Duration::from_secs(state.config.server.request_timeout_seconds);
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(method = %method, path = %path, timeout_secs = limit.as_secs(), "Request timed out");
            ApiError::from(AppError::timeout(format!(
                "{method} {path} exceeded {}s",
                limit.as_secs()
            )))
            .into_response()
        }
    }
}
