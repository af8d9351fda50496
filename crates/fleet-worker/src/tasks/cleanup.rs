//! Nightly data store maintenance.

use std::time::Duration;

use async_trait::async_trait;

use fleet_core::config::DailyTaskConfig;
use fleet_core::result::AppResult;
use fleet_database::DatabaseManager;

use crate::schedule::Schedule;
use crate::task::BackgroundTask;

/// Runs the store's maintenance hook once a day.
#[derive(Debug, Clone)]
pub struct DatabaseCleanupTask {
    db: DatabaseManager,
    hour: u32,
    retry: Duration,
}

impl DatabaseCleanupTask {
    pub fn new(db: DatabaseManager, config: &DailyTaskConfig) -> Self {
        Self {
            db,
            hour: config.hour,
            retry: Duration::from_secs(config.retry_seconds),
        }
    }
}

#[async_trait]
impl BackgroundTask for DatabaseCleanupTask {
    fn name(&self) -> &'static str {
        "database_cleanup"
    }

    fn schedule(&self) -> Schedule {
        Schedule::DailyAt { hour: self.hour }
    }

    fn retry_delay(&self) -> Duration {
        self.retry
    }

    async fn run(&self) -> AppResult<()> {
        self.db.maintenance().await
    }
}
