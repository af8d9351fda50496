//! Background task capability.

use std::time::Duration;

use async_trait::async_trait;

use fleet_core::result::AppResult;

use crate::schedule::Schedule;

/// A unit of periodic work.
#[async_trait]
pub trait BackgroundTask: Send + Sync + 'static {
    /// Name used in logs.
    fn name(&self) -> &'static str;

    /// When the scheduler fires the task.
    fn schedule(&self) -> Schedule;

    /// Wait before the next attempt after a failure.
    fn retry_delay(&self) -> Duration;

    /// Do the work once.
    async fn run(&self) -> AppResult<()>;
}
