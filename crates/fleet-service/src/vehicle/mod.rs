//! Vehicle catalogue.

pub mod service;

pub use service::{VehicleQuery, VehicleService};
