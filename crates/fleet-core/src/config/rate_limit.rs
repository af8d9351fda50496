//! Rate limiting configuration.

use serde::{Deserialize, Serialize};

/// Fixed-window rate limiting policies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whether the limiter is active at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Policy applied to every request.
    #[serde(default = "default_general")]
    pub general: RateLimitPolicyConfig,
    /// Stricter policy applied to the login route.
    #[serde(default = "default_auth")]
    pub auth: RateLimitPolicyConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            general: default_general(),
            auth: default_auth(),
        }
    }
}

/// One fixed-window policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitPolicyConfig {
    /// Requests accepted per window.
    pub permit_limit: u64,
    /// Window length in seconds.
    pub window_seconds: u64,
}

fn default_enabled() -> bool {
    true
}

fn default_general() -> RateLimitPolicyConfig {
    RateLimitPolicyConfig {
        permit_limit: 100,
        window_seconds: 60,
    }
}

fn default_auth() -> RateLimitPolicyConfig {
    RateLimitPolicyConfig {
        permit_limit: 5,
        window_seconds: 60,
    }
}
