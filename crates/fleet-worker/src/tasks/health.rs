//! Periodic health sampling.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use fleet_core::config::IntervalTaskConfig;
use fleet_core::result::AppResult;
use fleet_service::{HealthCheckExecutor, HealthFilter, HealthStatus};

use crate::schedule::Schedule;
use crate::task::BackgroundTask;

/// Runs every health check and logs anything that is not healthy.
#[derive(Debug, Clone)]
pub struct HealthSamplingTask {
    executor: HealthCheckExecutor,
    interval: Duration,
    retry: Duration,
}

impl HealthSamplingTask {
    pub fn new(executor: HealthCheckExecutor, config: &IntervalTaskConfig) -> Self {
        Self {
            executor,
            interval: Duration::from_secs(config.interval_seconds),
            retry: Duration::from_secs(config.retry_seconds),
        }
    }
}

#[async_trait]
impl BackgroundTask for HealthSamplingTask {
    fn name(&self) -> &'static str {
        "health_sampling"
    }

    fn schedule(&self) -> Schedule {
        Schedule::Every(self.interval)
    }

    fn retry_delay(&self) -> Duration {
        self.retry
    }

    async fn run(&self) -> AppResult<()> {
        let report = self.executor.run(HealthFilter::All).await;
        for entry in report
            .entries
            .iter()
            .filter(|e| e.status != HealthStatus::Healthy)
        {
            warn!(
                check = entry.name,
                status = %entry.status,
                description = entry.description.as_deref().unwrap_or(""),
                error = entry.exception.as_deref().unwrap_or(""),
                data = ?entry.data,
                "Health check not healthy"
            );
        }
        debug!(status = %report.status, checks = report.entries.len(), "Health sampled");
        Ok(())
    }
}
