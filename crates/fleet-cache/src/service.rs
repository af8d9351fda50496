//! Typed, best-effort cache access.
//!
//! Every failure is logged and swallowed: a broken cache behaves like an
//! empty one, and a value that no longer deserializes is a miss.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use fleet_core::traits::CacheProvider;

use crate::provider::CacheManager;

/// JSON cache facade used by the service layer.
#[derive(Debug, Clone)]
pub struct CacheService {
    cache: Arc<CacheManager>,
}

impl CacheService {
    /// Wrap a cache manager.
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }

    /// Read and deserialize a value. Any error is reported as a miss.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key, "Cache miss");
                return None;
            }
            Err(e) => {
                warn!(key, error = %e, "Cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    /// Serialize and store a value, with the default expiry when `ttl` is `None`.
    pub async fn set<T: Serialize + Sync + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Cache value not serializable");
                return;
            }
        };
        let ttl = ttl.unwrap_or_else(|| self.cache.default_ttl());
        if let Err(e) = self.cache.set(key, &raw, ttl).await {
            warn!(key, error = %e, "Cache write failed");
        }
    }

    /// Remove one key.
    pub async fn remove(&self, key: &str) {
        if let Err(e) = self.cache.delete(key).await {
            warn!(key, error = %e, "Cache delete failed");
        }
    }

    /// Remove every key matching a glob pattern.
    pub async fn remove_by_pattern(&self, pattern: &str) {
        match self.cache.delete_pattern(pattern).await {
            Ok(count) => debug!(pattern, count, "Cache keys removed"),
            Err(e) => warn!(pattern, error = %e, "Cache pattern delete failed"),
        }
    }
}
