//! Cache probe.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use fleet_cache::CacheManager;
use fleet_core::result::AppResult;
use fleet_core::traits::CacheProvider;

use super::check::{HealthCheck, HealthCheckResult};

/// Degraded rather than unhealthy on failure: every cache read falls back
/// to the data store.
#[derive(Debug, Clone)]
pub struct CacheHealthCheck {
    cache: Arc<CacheManager>,
}

impl CacheHealthCheck {
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HealthCheck for CacheHealthCheck {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["cache", "ready"]
    }

    async fn check(&self) -> AppResult<HealthCheckResult> {
        Ok(match self.cache.health_check().await {
            Ok(true) => HealthCheckResult::healthy("Cache is reachable"),
            Ok(false) => HealthCheckResult::degraded("Cache answered unexpectedly"),
            Err(e) => {
                warn!(error = %e, "Cache health check failed");
                HealthCheckResult {
                    error: Some(e.to_string()),
                    ..HealthCheckResult::degraded("Cache is unreachable")
                }
            }
        })
    }
}
