//! # fleet-service
//!
//! Use cases behind the HTTP handlers and the background tasks. Services
//! receive their collaborators at construction time and are cheap to clone.

pub mod administrator;
pub mod health;
pub mod statistics;
pub mod vehicle;

pub use administrator::{AdministratorService, LoginOutcome, NewAdministratorInput};
pub use health::{HealthCheck, HealthCheckExecutor, HealthCheckResult, HealthFilter, HealthReport, HealthStatus};
pub use statistics::{Statistics, StatisticsService};
pub use vehicle::{VehicleQuery, VehicleService};
