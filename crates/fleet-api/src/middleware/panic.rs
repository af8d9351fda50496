//! Turns a handler panic into the 500 problem document.

use std::any::Any;

use axum::response::{IntoResponse, Response};
use tracing::error;

use fleet_core::error::AppError;

use crate::error::ApiError;

/// Panic handler for `CatchPanicLayer::custom`.
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(panic = %message, "Handler panicked");
    ApiError::from(AppError::internal(message)).into_response()
}
