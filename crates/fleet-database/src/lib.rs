//! # fleet-database
//!
//! Data access for the fleet service: the [`DataStore`] and
//! [`UnitOfWork`] capabilities, a PostgreSQL provider built on sqlx, and
//! an in-process memory provider with the same transactional semantics.

pub mod connection;
pub mod error;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod store;

pub use connection::DatabasePool;
pub use store::{DataStore, DatabaseManager, UnitOfWork};
