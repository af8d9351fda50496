//! Health check capability and result types.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use fleet_core::result::AppResult;

/// Outcome of a probe. Ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum HealthStatus {
    Unhealthy,
    Degraded,
    Healthy,
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unhealthy => write!(f, "Unhealthy"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Healthy => write!(f, "Healthy"),
        }
    }
}

/// What a probe reports.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthCheckResult {
    pub status: HealthStatus,
    pub description: Option<String>,
    pub data: BTreeMap<String, Value>,
    /// Message of the failure that caused an unhealthy result.
    pub error: Option<String>,
}

impl HealthCheckResult {
    fn new(status: HealthStatus, description: impl Into<String>) -> Self {
        Self {
            status,
            description: Some(description.into()),
            data: BTreeMap::new(),
            error: None,
        }
    }

    pub fn healthy(description: impl Into<String>) -> Self {
        Self::new(HealthStatus::Healthy, description)
    }

    pub fn degraded(description: impl Into<String>) -> Self {
        Self::new(HealthStatus::Degraded, description)
    }

    pub fn unhealthy(description: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::new(HealthStatus::Unhealthy, description)
        }
    }

    /// Attach a data point.
    pub fn with_data(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

/// A named probe.
///
/// An `Err` from [`HealthCheck::check`] is reported as unhealthy by the
/// executor, so probes only build results for conditions they understand.
#[async_trait]
pub trait HealthCheck: Send + Sync + 'static {
    /// Name shown in reports.
    fn name(&self) -> &'static str;

    /// Tags used to select subsets of checks.
    fn tags(&self) -> &'static [&'static str];

    /// Run the probe.
    async fn check(&self) -> AppResult<HealthCheckResult>;
}

/// Reports that the process is up and serving.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfHealthCheck;

#[async_trait]
impl HealthCheck for SelfHealthCheck {
    fn name(&self) -> &'static str {
        "self"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["api"]
    }

    async fn check(&self) -> AppResult<HealthCheckResult> {
        Ok(HealthCheckResult::healthy("API is running"))
    }
}
