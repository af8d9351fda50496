//! Core traits defined in `fleet-core` and implemented by other crates.

pub mod cache;
pub mod repository;

pub use cache::CacheProvider;
pub use repository::{Entity, Repository};
