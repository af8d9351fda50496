//! Statistics endpoint.

use axum::Json;
use axum::extract::State;

use fleet_service::Statistics;

use crate::error::ApiError;
use crate::extractors::AnyUser;
use crate::state::AppState;

/// GET /api/estatisticas
pub async fn statistics(
    _user: AnyUser,
    State(state): State<AppState>,
) -> Result<Json<Statistics>, ApiError> {
    Ok(Json(state.statistics.current().await?))
}
