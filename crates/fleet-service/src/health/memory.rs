//! Process memory probe.

use async_trait::async_trait;
use sysinfo::{ProcessRefreshKind, ProcessesToUpdate, System};

use fleet_core::error::{AppError, ErrorKind};
use fleet_core::result::AppResult;

use super::check::{HealthCheck, HealthCheckResult};

/// Degraded when the resident set exceeds the threshold.
#[derive(Debug, Clone)]
pub struct MemoryHealthCheck {
    threshold_mb: u64,
}

impl MemoryHealthCheck {
    pub fn new(threshold_mb: u64) -> Self {
        Self { threshold_mb }
    }

    /// Classify a resident set size given in megabytes.
    pub fn evaluate(&self, working_set_mb: u64) -> HealthCheckResult {
        let result = if working_set_mb > self.threshold_mb {
            HealthCheckResult::degraded("High memory usage detected")
        } else {
            HealthCheckResult::healthy("Memory usage is normal")
        };
        result
            .with_data("working_set_mb", working_set_mb)
            .with_data("threshold_mb", self.threshold_mb)
    }
}

/// Resident set size of this process in bytes.
fn resident_bytes() -> AppResult<u64> {
    let pid = sysinfo::get_current_pid()
        .map_err(|e| AppError::internal(format!("Unable to resolve own process id: {e}")))?;
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_memory(),
    );
    system
        .process(pid)
        .map(|process| process.memory())
        .ok_or_else(|| AppError::internal("Own process missing from the process table"))
}

#[async_trait]
impl HealthCheck for MemoryHealthCheck {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["memory", "performance"]
    }

    async fn check(&self) -> AppResult<HealthCheckResult> {
        let bytes = tokio::task::spawn_blocking(resident_bytes)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Memory probe aborted", e))??;
        Ok(self.evaluate(bytes / (1024 * 1024)))
    }
}
