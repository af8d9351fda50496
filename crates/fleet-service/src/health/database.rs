//! Data store probe.

use async_trait::async_trait;
use tracing::error;

use fleet_core::result::AppResult;
use fleet_database::DatabaseManager;

use super::check::{HealthCheck, HealthCheckResult};

/// Healthy when the store answers a ping and both tables can be counted.
#[derive(Debug, Clone)]
pub struct DatabaseHealthCheck {
    db: DatabaseManager,
}

impl DatabaseHealthCheck {
    pub fn new(db: DatabaseManager) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HealthCheck for DatabaseHealthCheck {
    fn name(&self) -> &'static str {
        "database"
    }

    fn tags(&self) -> &'static [&'static str] {
        &["database", "ready"]
    }

    async fn check(&self) -> AppResult<HealthCheckResult> {
        let probe = async {
            self.db.ping().await?;
            let vehicles = self.db.vehicles().count().await?;
            let administrators = self.db.administrators().count().await?;
            AppResult::Ok((vehicles, administrators))
        };

        Ok(match probe.await {
            Ok((vehicles, administrators)) => HealthCheckResult::healthy("Database is healthy")
                .with_data("veiculos_count", vehicles)
                .with_data("administradores_count", administrators)
                .with_data("provider", self.db.provider()),
            Err(e) => {
                error!(error = %e, "Database health check failed");
                HealthCheckResult::unhealthy("Database is unhealthy", &e)
            }
        })
    }
}
