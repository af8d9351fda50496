//! # fleet-core
//!
//! Core crate for the fleet service. Contains configuration schemas, the
//! repository and cache capability traits, pagination and filter types,
//! and the unified error system.
//!
//! This crate has **no** internal dependencies on other fleet crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
