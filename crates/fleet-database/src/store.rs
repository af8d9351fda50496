//! Data store capabilities and provider selection.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use fleet_core::config::DatabaseConfig;
use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_core::traits::Repository;
use fleet_entity::{Administrator, Vehicle};

use crate::connection::DatabasePool;
use crate::memory::MemoryDataStore;
use crate::migration::run_migrations;
use crate::postgres::PgDataStore;

/// A group of repository writes sharing one transaction boundary.
///
/// Writes issued through the unit's repositories are invisible to other
/// readers until they are saved. Without [`UnitOfWork::begin`],
/// [`UnitOfWork::save_changes`] makes them durable directly. After `begin`,
/// only writes saved before [`UnitOfWork::commit`] become durable; later
/// writes are discarded. Dropping a unit discards everything unsaved.
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Vehicle repository bound to this unit.
    fn vehicles(&self) -> &dyn Repository<Vehicle>;

    /// Administrator repository bound to this unit.
    fn administrators(&self) -> &dyn Repository<Administrator>;

    /// Open an explicit transaction.
    async fn begin(&self) -> AppResult<()>;

    /// Persist the writes issued since the last save. Returns their count.
    async fn save_changes(&self) -> AppResult<u64>;

    /// Make every saved write durable and close the transaction.
    async fn commit(&self) -> AppResult<()>;

    /// Discard every write since `begin` and close the transaction.
    async fn rollback(&self) -> AppResult<()>;
}

/// A backing store for vehicles and administrators.
#[async_trait]
pub trait DataStore: Send + Sync + std::fmt::Debug + 'static {
    /// Short provider name for logs and health data.
    fn provider(&self) -> &'static str;

    /// Auto-committing vehicle repository.
    fn vehicles(&self) -> Arc<dyn Repository<Vehicle>>;

    /// Auto-committing administrator repository.
    fn administrators(&self) -> Arc<dyn Repository<Administrator>>;

    /// Start a new unit of work.
    fn unit_of_work(&self) -> Box<dyn UnitOfWork>;

    /// Verify the store answers a trivial query.
    async fn ping(&self) -> AppResult<()>;

    /// Routine housekeeping (statistics refresh and similar).
    async fn maintenance(&self) -> AppResult<()>;

    /// Release connections.
    async fn close(&self);
}

/// Application-facing handle that dispatches to the configured provider.
#[derive(Debug, Clone)]
pub struct DatabaseManager {
    store: Arc<dyn DataStore>,
}

impl DatabaseManager {
    /// Connect to the provider named in configuration.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let store: Arc<dyn DataStore> = match config.provider.as_str() {
            "postgres" => {
                let pool = DatabasePool::connect(config).await?.into_pool();
                if config.run_migrations {
                    run_migrations(&pool).await?;
                } else {
                    warn!("Automatic migrations disabled");
                }
                Arc::new(PgDataStore::new(pool))
            }
            "memory" => Arc::new(MemoryDataStore::new()),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown database provider: '{other}'"
                )));
            }
        };
        info!(provider = store.provider(), "Data store ready");
        Ok(Self { store })
    }

    /// Wrap an existing store.
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self { store }
    }

    /// A fresh, empty in-process store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryDataStore::new()))
    }

    /// Provider name.
    pub fn provider(&self) -> &'static str {
        self.store.provider()
    }

    /// Auto-committing vehicle repository.
    pub fn vehicles(&self) -> Arc<dyn Repository<Vehicle>> {
        self.store.vehicles()
    }

    /// Auto-committing administrator repository.
    pub fn administrators(&self) -> Arc<dyn Repository<Administrator>> {
        self.store.administrators()
    }

    /// Start a new unit of work.
    pub fn unit_of_work(&self) -> Box<dyn UnitOfWork> {
        self.store.unit_of_work()
    }

    /// Connectivity probe.
    pub async fn ping(&self) -> AppResult<()> {
        self.store.ping().await
    }

    /// Routine housekeeping.
    pub async fn maintenance(&self) -> AppResult<()> {
        self.store.maintenance().await
    }

    /// Release connections.
    pub async fn close(&self) {
        self.store.close().await;
    }
}
