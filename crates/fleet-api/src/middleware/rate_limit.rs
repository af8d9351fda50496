//! Fixed-window rate limiting keyed by client identity.
//!
//! Counters live in the cache provider so every instance sharing a Redis
//! backend sees the same window. The first request of a window creates the
//! counter together with its expiry; the window resets when the key expires.

use std::net::SocketAddr;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::header::{RETRY_AFTER, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use sha2::{Digest, Sha256};
use tracing::warn;

use fleet_cache::{CacheManager, keys};
use fleet_core::config::RateLimitPolicyConfig;
use fleet_core::traits::CacheProvider;

use crate::state::AppState;

/// Body of every 429 response.
pub const REJECTION_MESSAGE: &str = "Muitas requisições. Tente novamente mais tarde.";

/// Outcome of counting one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Rejected { retry_after: Duration },
}

/// `{ip}:{sha256(user-agent)}`.
///
/// The address is the first `X-Forwarded-For` entry, else the socket peer,
/// else `unknown`.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let ip = forwarded
        .or_else(|| peer.map(|p| p.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string());

    let agent = headers
        .get(USER_AGENT)
        .map(|v| v.as_bytes())
        .unwrap_or_default();

    format!("{ip}:{}", hex::encode(Sha256::digest(agent)))
}

/// Count a request against `policy`. Cache failures let the request through.
pub async fn check(
    cache: &CacheManager,
    policy_name: &str,
    policy: &RateLimitPolicyConfig,
    identity: &str,
) -> Decision {
    let key = keys::rate_limit(policy_name, identity);
    let window = Duration::from_secs(policy.window_seconds);

    let count = match cache.incr(&key, window).await {
        Ok(count) => count,
        Err(e) => {
            warn!(policy = policy_name, error = %e, "Rate limiter unavailable, allowing request");
            return Decision::Allowed;
        }
    };

    if count > 0 && count as u64 > policy.permit_limit {
        Decision::Rejected {
            retry_after: window,
        }
    } else {
        Decision::Allowed
    }
}

/// Policy applied to every route.
pub async fn general_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let policy = state.config.rate_limit.general.clone();
    enforce(&state, "general", &policy, request, next).await
}

/// Stricter policy for the login route.
pub async fn auth_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let policy = state.config.rate_limit.auth.clone();
    enforce(&state, "auth", &policy, request, next).await
}

async fn enforce(
    state: &AppState,
    policy_name: &str,
    policy: &RateLimitPolicyConfig,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let identity = client_identity(request.headers(), peer);

    match check(&state.cache, policy_name, policy, &identity).await {
        Decision::Allowed => next.run(request).await,
        Decision::Rejected { retry_after } => {
            warn!(policy = policy_name, identity = %identity, path = %request.uri().path(), "Rate limit exceeded");
            (
                StatusCode::TOO_MANY_REQUESTS,
                [(RETRY_AFTER, retry_after.as_secs().to_string())],
                REJECTION_MESSAGE,
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;
    use axum::http::HeaderValue;
    use fleet_cache::memory::MemoryCacheProvider;
    use fleet_core::config::MemoryCacheConfig;
    use fleet_core::error::AppError;
    use fleet_core::result::AppResult;

    use super::*;

    fn cache() -> CacheManager {
        CacheManager::from_provider(
            Arc::new(MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 })),
            Duration::from_secs(60),
        )
    }

    #[test]
    fn test_identity_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert(USER_AGENT, HeaderValue::from_static("curl/8.0"));
        let peer: SocketAddr = "192.0.2.1:5000".parse().unwrap();

        let identity = client_identity(&headers, Some(peer));
        assert!(identity.starts_with("203.0.113.7:"));
        assert_eq!(identity.len(), "203.0.113.7:".len() + 64);
    }

    #[test]
    fn test_identity_fallbacks() {
        let peer: SocketAddr = "192.0.2.1:5000".parse().unwrap();
        assert!(client_identity(&HeaderMap::new(), Some(peer)).starts_with("192.0.2.1:"));
        assert!(client_identity(&HeaderMap::new(), None).starts_with("unknown:"));
    }

    #[test]
    fn test_identity_depends_on_user_agent() {
        let mut a = HeaderMap::new();
        a.insert(USER_AGENT, HeaderValue::from_static("firefox"));
        let mut b = HeaderMap::new();
        b.insert(USER_AGENT, HeaderValue::from_static("chrome"));
        assert_ne!(client_identity(&a, None), client_identity(&b, None));
    }

    #[tokio::test]
    async fn test_window_rejects_after_limit() {
        let cache = cache();
        let policy = RateLimitPolicyConfig {
            permit_limit: 3,
            window_seconds: 60,
        };

        for _ in 0..3 {
            assert_eq!(check(&cache, "test", &policy, "a").await, Decision::Allowed);
        }
        assert_eq!(
            check(&cache, "test", &policy, "a").await,
            Decision::Rejected {
                retry_after: Duration::from_secs(60)
            }
        );
        assert_eq!(check(&cache, "test", &policy, "b").await, Decision::Allowed);
        assert_eq!(check(&cache, "other", &policy, "a").await, Decision::Allowed);
    }

    /// Memory provider whose first increment fails.
    #[derive(Debug)]
    struct FlakyCache {
        inner: MemoryCacheProvider,
        failed: AtomicBool,
    }

    #[async_trait]
    impl CacheProvider for FlakyCache {
        async fn get(&self, key: &str) -> AppResult<Option<String>> {
            self.inner.get(key).await
        }
        async fn set(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
            self.inner.set(key, value, ttl).await
        }
        async fn delete(&self, key: &str) -> AppResult<()> {
            self.inner.delete(key).await
        }
        async fn exists(&self, key: &str) -> AppResult<bool> {
            self.inner.exists(key).await
        }
        async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
            self.inner.delete_pattern(pattern).await
        }
        async fn incr(&self, key: &str, window: Duration) -> AppResult<i64> {
            if !self.failed.swap(true, Ordering::SeqCst) {
                return Err(AppError::cache("connection reset"));
            }
            self.inner.incr(key, window).await
        }
        async fn health_check(&self) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_window_resets_after_cache_failure() {
        let cache = CacheManager::from_provider(
            Arc::new(FlakyCache {
                inner: MemoryCacheProvider::new(&MemoryCacheConfig { max_capacity: 100 }),
                failed: AtomicBool::new(false),
            }),
            Duration::from_secs(60),
        );
        let policy = RateLimitPolicyConfig {
            permit_limit: 2,
            window_seconds: 1,
        };

        // The failed increment fails open.
        assert_eq!(check(&cache, "test", &policy, "a").await, Decision::Allowed);
        assert_eq!(check(&cache, "test", &policy, "a").await, Decision::Allowed);
        assert_eq!(check(&cache, "test", &policy, "a").await, Decision::Allowed);
        assert!(matches!(
            check(&cache, "test", &policy, "a").await,
            Decision::Rejected { .. }
        ));

        tokio::time::sleep(Duration::from_millis(1_500)).await;

        assert_eq!(check(&cache, "test", &policy, "a").await, Decision::Allowed);
    }
}
