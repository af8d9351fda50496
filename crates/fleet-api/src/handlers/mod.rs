//! Route handlers organized by domain.

pub mod administrators;
pub mod health;
pub mod home;
pub mod statistics;
pub mod vehicles;

use fleet_core::error::AppError;

use crate::error::ApiError;

/// Fallback for unmatched routes.
pub async fn not_found() -> ApiError {
    AppError::not_found("No route matches the request").into()
}
