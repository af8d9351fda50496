//! Keeps the statistics cache entry warm.

use std::time::Duration;

use async_trait::async_trait;

use fleet_core::config::IntervalTaskConfig;
use fleet_core::result::AppResult;
use fleet_service::StatisticsService;

use crate::schedule::Schedule;
use crate::task::BackgroundTask;

/// Recomputes the statistics entry on an interval.
#[derive(Debug, Clone)]
pub struct CacheWarmupTask {
    statistics: StatisticsService,
    interval: Duration,
    retry: Duration,
}

impl CacheWarmupTask {
    pub fn new(statistics: StatisticsService, config: &IntervalTaskConfig) -> Self {
        Self {
            statistics,
            interval: Duration::from_secs(config.interval_seconds),
            retry: Duration::from_secs(config.retry_seconds),
        }
    }
}

#[async_trait]
impl BackgroundTask for CacheWarmupTask {
    fn name(&self) -> &'static str {
        "cache_warmup"
    }

    fn schedule(&self) -> Schedule {
        Schedule::Every(self.interval)
    }

    fn retry_delay(&self) -> Duration {
        self.retry
    }

    async fn run(&self) -> AppResult<()> {
        self.statistics.refresh().await?;
        Ok(())
    }
}
