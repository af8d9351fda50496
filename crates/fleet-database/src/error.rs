//! Translation of sqlx failures into [`AppError`].

use fleet_core::error::{AppError, ErrorKind};
use tracing::{error, warn};

/// Build a `map_err` adapter that logs the failure with `context` and
/// wraps it as a database error. Unique-key violations become conflicts.
pub(crate) fn db_error(context: impl Into<String>) -> impl FnOnce(sqlx::Error) -> AppError {
    let context = context.into();
    move |e| {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                warn!(error = %e, "{context}: unique constraint violated");
                return AppError::with_source(
                    ErrorKind::Conflict,
                    format!("{context}: a record with the same key already exists"),
                    e,
                );
            }
        }
        error!(error = %e, "{context}");
        AppError::with_source(ErrorKind::Database, context, e)
    }
}
