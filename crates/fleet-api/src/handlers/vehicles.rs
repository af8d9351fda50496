//! Vehicle CRUD handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;

use fleet_core::error::AppError;
use fleet_service::VehicleQuery;

use crate::dto::request::{VehicleListQuery, VehicleRequest};
use crate::dto::response::VehicleView;
use crate::error::ApiError;
use crate::extractors::{AdminUser, AnyUser, ApiJson, ApiPath, ApiQuery, StaffUser};
use crate::state::AppState;

fn vehicle_not_found(id: i64) -> ApiError {
    AppError::not_found(format!("Vehicle {id} not found")).into()
}

/// POST /veiculos
pub async fn create(
    _user: StaffUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<VehicleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = req.into_draft().map_err(ApiError::Invalid)?;
    let vehicle = state.vehicles.create(&draft).await?;

    let location = format!("/veiculos/{}", vehicle.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(VehicleView::from(vehicle)),
    ))
}

/// GET /veiculos?pagina=n&nome=&marca=
pub async fn list(
    _user: AnyUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<VehicleListQuery>,
) -> Result<Json<Vec<VehicleView>>, ApiError> {
    let vehicles = state
        .vehicles
        .list(&VehicleQuery {
            page: query.pagina,
            name: query.nome,
            brand: query.marca,
        })
        .await?;
    Ok(Json(vehicles.into_iter().map(VehicleView::from).collect()))
}

/// GET /veiculos/{id}
pub async fn get(
    _user: StaffUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<VehicleView>, ApiError> {
    let vehicle = state
        .vehicles
        .get(id)
        .await?
        .ok_or_else(|| vehicle_not_found(id))?;
    Ok(Json(vehicle.into()))
}

/// PUT /veiculos/{id}
///
/// A missing vehicle is reported before the body is validated.
pub async fn update(
    _admin: AdminUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(req): ApiJson<VehicleRequest>,
) -> Result<Json<VehicleView>, ApiError> {
    if state.vehicles.get(id).await?.is_none() {
        return Err(vehicle_not_found(id));
    }

    let changes = req.into_draft().map_err(ApiError::Invalid)?;
    let updated = state.vehicles.update(id, &changes).await?;
    Ok(Json(updated.into()))
}

/// DELETE /veiculos/{id}
pub async fn delete(
    _admin: AdminUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode, ApiError> {
    if state.vehicles.delete(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(vehicle_not_found(id))
    }
}
