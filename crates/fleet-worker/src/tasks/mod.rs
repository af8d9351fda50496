//! Built-in maintenance tasks.

pub mod cleanup;
pub mod health;
pub mod warmup;

pub use cleanup::DatabaseCleanupTask;
pub use health::HealthSamplingTask;
pub use warmup::CacheWarmupTask;
