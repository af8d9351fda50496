//! Health probe configuration.

use serde::{Deserialize, Serialize};

/// Thresholds used by the health checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Resident memory above which the memory probe reports degraded.
    #[serde(default = "default_memory_threshold")]
    pub memory_threshold_mb: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            memory_threshold_mb: default_memory_threshold(),
        }
    }
}

fn default_memory_threshold() -> u64 {
    500
}
