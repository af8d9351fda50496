//! PostgreSQL-backed [`DataStore`].

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use fleet_core::result::AppResult;
use fleet_core::traits::Repository;
use fleet_entity::{Administrator, Vehicle};

use super::administrator::PgAdministratorRepository;
use super::unit_of_work::PgUnitOfWork;
use super::vehicle::PgVehicleRepository;
use crate::error::db_error;
use crate::store::{DataStore, UnitOfWork};

/// Data store over a sqlx PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PgDataStore {
    pool: PgPool,
    vehicles: Arc<PgVehicleRepository>,
    administrators: Arc<PgAdministratorRepository>,
}

impl PgDataStore {
    /// Build the store and its auto-committing repositories.
    pub fn new(pool: PgPool) -> Self {
        Self {
            vehicles: Arc::new(PgVehicleRepository::new(pool.clone())),
            administrators: Arc::new(PgAdministratorRepository::new(pool.clone())),
            pool,
        }
    }
}

#[async_trait]
impl DataStore for PgDataStore {
    fn provider(&self) -> &'static str {
        "postgres"
    }

    fn vehicles(&self) -> Arc<dyn Repository<Vehicle>> {
        self.vehicles.clone()
    }

    fn administrators(&self) -> Arc<dyn Repository<Administrator>> {
        self.administrators.clone()
    }

    fn unit_of_work(&self) -> Box<dyn UnitOfWork> {
        Box::new(PgUnitOfWork::new(self.pool.clone()))
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(db_error("Database ping failed"))
    }

    async fn maintenance(&self) -> AppResult<()> {
        sqlx::query("ANALYZE vehicles, administrators")
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to refresh table statistics"))?;
        info!("Table statistics refreshed");
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}
