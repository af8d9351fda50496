//! Periodic background tasks.
//!
//! This crate provides:
//! - The [`BackgroundTask`] capability and its [`Schedule`]
//! - A [`TaskRunner`] that registers each task with a cron scheduler and stops it on shutdown
//! - The built-in cache warmup, database cleanup and health sampling tasks

pub mod runner;
pub mod schedule;
pub mod task;
pub mod tasks;

pub use runner::TaskRunner;
pub use schedule::Schedule;
pub use task::BackgroundTask;
