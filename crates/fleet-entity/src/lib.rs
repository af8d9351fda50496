//! Domain entities persisted by the fleet service.

pub mod administrator;
pub mod vehicle;

pub use administrator::{Administrator, NewAdministrator, Role};
pub use vehicle::{NewVehicle, Vehicle};
