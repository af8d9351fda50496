//! Health check handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;

use fleet_service::{HealthFilter, HealthReport, HealthStatus};

use crate::dto::response::ApiHealthResponse;
use crate::state::AppState;

/// GET /health
///
/// Always 200; the body carries the aggregated status.
pub async fn health(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health.run(HealthFilter::All).await)
}

/// GET /health/ready
pub async fn ready(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health.run(HealthFilter::Tagged("ready")).await;
    let status = if report.status == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Json(report))
}

/// GET /health/live
pub async fn live(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health.run(HealthFilter::None).await)
}

/// GET /api/health
pub async fn api_health() -> Json<ApiHealthResponse> {
    Json(ApiHealthResponse {
        status: "Healthy".to_string(),
        timestamp: Utc::now(),
        version: "1.0.0".to_string(),
    })
}
