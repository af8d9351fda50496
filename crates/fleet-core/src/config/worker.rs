//! Background task configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Schedules for the periodic maintenance tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether background tasks are started.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Cache warmup schedule.
    #[serde(default = "default_cache_warmup")]
    pub cache_warmup: IntervalTaskConfig,
    /// Nightly database maintenance.
    #[serde(default = "default_database_cleanup")]
    pub database_cleanup: DailyTaskConfig,
    /// Periodic health sampling.
    #[serde(default = "default_health_sampling")]
    pub health_sampling: IntervalTaskConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            cache_warmup: default_cache_warmup(),
            database_cleanup: default_database_cleanup(),
            health_sampling: default_health_sampling(),
        }
    }
}

impl WorkerConfig {
    /// Reject schedules the task scheduler cannot express.
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, task) in [
            ("cache_warmup", &self.cache_warmup),
            ("health_sampling", &self.health_sampling),
        ] {
            if task.interval_seconds == 0 {
                return Err(AppError::configuration(format!(
                    "worker.{name}.interval_seconds must be greater than zero"
                )));
            }
        }
        if self.database_cleanup.hour > 23 {
            return Err(AppError::configuration(format!(
                "worker.database_cleanup.hour must be between 0 and 23, got {}",
                self.database_cleanup.hour
            )));
        }
        Ok(())
    }
}

/// A task that repeats on a fixed interval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntervalTaskConfig {
    /// Delay between successful runs, in seconds.
    pub interval_seconds: u64,
    /// Delay after a failed run, in seconds.
    pub retry_seconds: u64,
}

/// A task that runs once a day at a fixed hour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyTaskConfig {
    /// Hour of day in UTC (0-23).
    pub hour: u32,
    /// Delay after a failed run, in seconds.
    pub retry_seconds: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_cache_warmup() -> IntervalTaskConfig {
    IntervalTaskConfig {
        interval_seconds: 30 * 60,
        retry_seconds: 5 * 60,
    }
}

fn default_database_cleanup() -> DailyTaskConfig {
    DailyTaskConfig {
        hour: 2,
        retry_seconds: 60 * 60,
    }
}

fn default_health_sampling() -> IntervalTaskConfig {
    IntervalTaskConfig {
        interval_seconds: 5 * 60,
        retry_seconds: 60,
    }
}
