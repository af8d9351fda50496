//! Administrator accounts.

pub mod model;
pub mod role;

pub use model::{Administrator, NewAdministrator};
pub use role::Role;
