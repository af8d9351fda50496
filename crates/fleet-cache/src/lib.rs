//! # fleet-cache
//!
//! Cache provider implementations. Supports two modes:
//!
//! - **memory**: In-process cache using [moka](https://crates.io/crates/moka)
//! - **redis**: Redis-backed cache using the [redis](https://crates.io/crates/redis) crate
//!
//! The provider is selected at runtime based on configuration.
//! [`CacheService`] layers typed, failure-tolerant access on top.

pub mod keys;
#[cfg(feature = "memory")]
pub mod memory;
pub mod provider;
#[cfg(feature = "redis-backend")]
pub mod redis;
pub mod service;

pub use provider::CacheManager;
pub use service::CacheService;
