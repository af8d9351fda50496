//! Run schedules.

use std::fmt;
use std::time::Duration;

/// When a task runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// After every interval, counted from scheduler start.
    Every(Duration),
    /// Once a day at the start of the given UTC hour.
    DailyAt { hour: u32 },
}

impl Schedule {
    /// Six-field cron expression (`sec min hour dom mon dow`) firing daily at `hour`.
    pub fn daily_cron(hour: u32) -> String {
        format!("0 0 {hour} * * *")
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Every(interval) => write!(f, "every {}s", interval.as_secs()),
            Self::DailyAt { hour } => write!(f, "daily at {hour:02}:00 UTC"),
        }
    }
}
