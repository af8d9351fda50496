//! # fleet-api
//!
//! HTTP API for the fleet service built on Axum.
//!
//! Provides the vehicle, administrator, statistics and health endpoints,
//! the middleware stack (logging, CORS, panic recovery, timeouts, rate
//! limiting), role-checking extractors, DTOs and error mapping.

pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::{build_router, with_middleware};
pub use state::AppState;
