//! Vehicle catalogue.

pub mod model;

pub use model::{NewVehicle, Vehicle};
