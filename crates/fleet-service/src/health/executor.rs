//! Concurrent execution of health checks and report aggregation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Serialize, Serializer};
use serde_json::Value;

use fleet_cache::CacheManager;
use fleet_core::config::HealthConfig;
use fleet_database::DatabaseManager;

use super::cache::CacheHealthCheck;
use super::check::{HealthCheck, HealthCheckResult, HealthStatus, SelfHealthCheck};
use super::database::DatabaseHealthCheck;
use super::memory::MemoryHealthCheck;

const CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Which registered checks a run includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthFilter {
    /// Every check.
    All,
    /// Checks carrying this tag.
    Tagged(&'static str),
    /// No checks; the report only proves the process answers.
    None,
}

impl HealthFilter {
    fn accepts(&self, tags: &[&str]) -> bool {
        match self {
            Self::All => true,
            Self::Tagged(tag) => tags.contains(tag),
            Self::None => false,
        }
    }
}

/// One check's line in a report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEntry {
    pub name: &'static str,
    pub status: HealthStatus,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
    pub description: Option<String>,
    pub data: BTreeMap<String, Value>,
    pub exception: Option<String>,
    pub tags: &'static [&'static str],
}

/// Aggregated result of one run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Worst status among the entries, `Healthy` when there are none.
    pub status: HealthStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(serialize_with = "serialize_duration")]
    pub duration: Duration,
    #[serde(rename = "checks")]
    pub entries: Vec<HealthEntry>,
}

impl HealthReport {
    /// Entry by check name.
    pub fn entry(&self, name: &str) -> Option<&HealthEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

/// Render a duration as `hh:mm:ss.fffffff` (100 ns resolution).
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let ticks = duration.subsec_nanos() / 100;
    format!(
        "{:02}:{:02}:{:02}.{:07}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        ticks
    )
}

fn serialize_duration<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_duration(*duration))
}

/// Runs registered checks concurrently, each under a timeout.
#[derive(Clone)]
pub struct HealthCheckExecutor {
    checks: Vec<Arc<dyn HealthCheck>>,
    timeout: Duration,
}

impl std::fmt::Debug for HealthCheckExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.checks.iter().map(|c| c.name()).collect();
        f.debug_struct("HealthCheckExecutor")
            .field("checks", &names)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for HealthCheckExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthCheckExecutor {
    /// An executor with no checks.
    pub fn new() -> Self {
        Self {
            checks: Vec::new(),
            timeout: CHECK_TIMEOUT,
        }
    }

    /// Database, cache, memory and self checks.
    pub fn standard(db: DatabaseManager, cache: Arc<CacheManager>, config: &HealthConfig) -> Self {
        Self::new()
            .with_check(DatabaseHealthCheck::new(db))
            .with_check(CacheHealthCheck::new(cache))
            .with_check(MemoryHealthCheck::new(config.memory_threshold_mb))
            .with_check(SelfHealthCheck)
    }

    /// Register a check.
    pub fn with_check(mut self, check: impl HealthCheck) -> Self {
        self.checks.push(Arc::new(check));
        self
    }

    /// Override the per-check timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the checks selected by `filter`.
    pub async fn run(&self, filter: HealthFilter) -> HealthReport {
        let started = Instant::now();
        let timestamp = Utc::now();

        let selected = self
            .checks
            .iter()
            .filter(|check| filter.accepts(check.tags()));
        let entries = join_all(selected.map(|check| self.run_one(check.as_ref()))).await;

        let status = entries
            .iter()
            .map(|entry| entry.status)
            .min()
            .unwrap_or(HealthStatus::Healthy);

        HealthReport {
            status,
            timestamp,
            duration: started.elapsed(),
            entries,
        }
    }

    async fn run_one(&self, check: &dyn HealthCheck) -> HealthEntry {
        let started = Instant::now();
        let result = match tokio::time::timeout(self.timeout, check.check()).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => HealthCheckResult::unhealthy("Health check failed", &e),
            Err(_) => HealthCheckResult::unhealthy(
                "Health check timed out",
                format!("no answer within {:?}", self.timeout),
            ),
        };

        HealthEntry {
            name: check.name(),
            status: result.status,
            duration: started.elapsed(),
            description: result.description,
            data: result.data,
            exception: result.error,
            tags: check.tags(),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use fleet_core::error::AppError;
    use fleet_core::result::AppResult;

    use super::*;

    struct Fixed(&'static str, &'static [&'static str], HealthStatus);

    #[async_trait]
    impl HealthCheck for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }
        fn tags(&self) -> &'static [&'static str] {
            self.1
        }
        async fn check(&self) -> AppResult<HealthCheckResult> {
            Ok(match self.2 {
                HealthStatus::Healthy => HealthCheckResult::healthy("ok"),
                HealthStatus::Degraded => HealthCheckResult::degraded("slow"),
                HealthStatus::Unhealthy => HealthCheckResult::unhealthy("down", "boom"),
            })
        }
    }

    struct Failing;

    #[async_trait]
    impl HealthCheck for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn tags(&self) -> &'static [&'static str] {
            &["ready"]
        }
        async fn check(&self) -> AppResult<HealthCheckResult> {
            Err(AppError::database("connection refused"))
        }
    }

    struct Slow;

    #[async_trait]
    impl HealthCheck for Slow {
        fn name(&self) -> &'static str {
            "slow"
        }
        fn tags(&self) -> &'static [&'static str] {
            &[]
        }
        async fn check(&self) -> AppResult<HealthCheckResult> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(HealthCheckResult::healthy("late"))
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::ZERO), "00:00:00.0000000");
        assert_eq!(
            format_duration(Duration::from_millis(3_723_456)),
            "01:02:03.4560000"
        );
        assert_eq!(format_duration(Duration::from_nanos(1_250)), "00:00:00.0000012");
    }

    #[tokio::test]
    async fn test_worst_status_wins() {
        let executor = HealthCheckExecutor::new()
            .with_check(Fixed("a", &["ready"], HealthStatus::Healthy))
            .with_check(Fixed("b", &["memory"], HealthStatus::Degraded));

        let report = executor.run(HealthFilter::All).await;
        assert_eq!(report.status, HealthStatus::Degraded);
        assert_eq!(report.entries.len(), 2);
    }

    #[tokio::test]
    async fn test_tag_filter_and_empty_run() {
        let executor = HealthCheckExecutor::new()
            .with_check(Fixed("a", &["ready"], HealthStatus::Healthy))
            .with_check(Fixed("b", &["memory"], HealthStatus::Unhealthy));

        let ready = executor.run(HealthFilter::Tagged("ready")).await;
        assert_eq!(ready.status, HealthStatus::Healthy);
        assert!(ready.entry("a").is_some());
        assert!(ready.entry("b").is_none());

        let live = executor.run(HealthFilter::None).await;
        assert_eq!(live.status, HealthStatus::Healthy);
        assert!(live.entries.is_empty());
    }

    #[tokio::test]
    async fn test_error_becomes_unhealthy_entry() {
        let report = HealthCheckExecutor::new().with_check(Failing).run(HealthFilter::All).await;
        assert_eq!(report.status, HealthStatus::Unhealthy);
        let entry = report.entry("failing").unwrap();
        assert!(entry.exception.as_deref().unwrap().contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_becomes_unhealthy_entry() {
        let report = HealthCheckExecutor::new()
            .with_check(Slow)
            .with_timeout(Duration::from_secs(1))
            .run(HealthFilter::All)
            .await;
        assert_eq!(report.status, HealthStatus::Unhealthy);
        assert_eq!(
            report.entry("slow").unwrap().description.as_deref(),
            Some("Health check timed out")
        );
    }

    #[tokio::test]
    async fn test_report_json_shape() {
        let report = HealthCheckExecutor::new()
            .with_check(Fixed("self", &["api"], HealthStatus::Healthy))
            .run(HealthFilter::All)
            .await;
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["status"], "Healthy");
        assert!(json["duration"].as_str().unwrap().starts_with("00:00:"));
        assert_eq!(json["checks"][0]["name"], "self");
        assert_eq!(json["checks"][0]["tags"][0], "api");
        assert!(json["checks"][0]["exception"].is_null());
    }

    #[tokio::test]
    async fn test_standard_set_against_memory_store() {
        use fleet_cache::memory::MemoryCacheProvider;
        use fleet_core::config::MemoryCacheConfig;

        let cache = Arc::new(CacheManager::from_provider(
            Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 10 })),
            Duration::from_secs(60),
        ));
        let executor = HealthCheckExecutor::standard(
            DatabaseManager::in_memory(),
            cache,
            &HealthConfig::default(),
        );

        let ready = executor.run(HealthFilter::Tagged("ready")).await;
        assert_eq!(ready.status, HealthStatus::Healthy);
        let db = ready.entry("database").unwrap();
        assert_eq!(db.data["veiculos_count"], 0);
        assert_eq!(db.data["administradores_count"], 0);
        assert!(ready.entry("cache").is_some());
    }
}
