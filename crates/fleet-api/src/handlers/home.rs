//! Welcome document.

use axum::Json;

use crate::dto::response::HomeResponse;

/// GET /
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse::default())
}
