//! Administrator accounts and login.

pub mod service;

pub use service::{AdministratorService, LoginOutcome, NewAdministratorInput};
