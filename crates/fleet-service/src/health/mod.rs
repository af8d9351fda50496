//! Health checks and their executor.

pub mod cache;
pub mod check;
pub mod database;
pub mod executor;
pub mod memory;

pub use cache::CacheHealthCheck;
pub use check::{HealthCheck, HealthCheckResult, HealthStatus, SelfHealthCheck};
pub use database::DatabaseHealthCheck;
pub use executor::{HealthCheckExecutor, HealthEntry, HealthFilter, HealthReport, format_duration};
pub use memory::MemoryHealthCheck;
