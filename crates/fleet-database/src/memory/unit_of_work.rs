//! Memory unit of work.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_core::traits::Repository;
use fleet_entity::{Administrator, Vehicle};

use super::repository::MemoryRepository;
use super::scope::{MemoryScope, UnitState, publish};
use super::table::MemoryTables;
use crate::store::UnitOfWork;

/// Unit of work that logs its writes and replays them onto the shared
/// tables on save (or on commit inside an explicit transaction).
///
/// Ids are drawn from the shared sequence when a row is added, and
/// uniqueness is checked again when the log is replayed, so concurrent
/// units never overwrite each other's rows.
pub struct MemoryUnitOfWork {
    store: Arc<RwLock<MemoryTables>>,
    state: Arc<Mutex<UnitState>>,
    vehicles: MemoryRepository<Vehicle>,
    administrators: MemoryRepository<Administrator>,
}

impl MemoryUnitOfWork {
    pub(crate) fn new(store: Arc<RwLock<MemoryTables>>) -> Self {
        let state = Arc::new(Mutex::new(UnitState::default()));
        let scope = MemoryScope::Unit {
            store: Arc::clone(&store),
            state: Arc::clone(&state),
        };
        Self {
            store,
            state,
            vehicles: MemoryRepository::new(scope.clone()),
            administrators: MemoryRepository::new(scope),
        }
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    fn vehicles(&self) -> &dyn Repository<Vehicle> {
        &self.vehicles
    }

    fn administrators(&self) -> &dyn Repository<Administrator> {
        &self.administrators
    }

    async fn begin(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if state.explicit {
            return Err(AppError::invalid_operation("A transaction is already in progress"));
        }
        if !state.pending.is_empty() {
            return Err(AppError::invalid_operation(
                "Save pending changes before beginning a transaction",
            ));
        }
        state.explicit = true;
        Ok(())
    }

    async fn save_changes(&self) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let pending = std::mem::take(&mut state.pending);
        let saved = pending.len() as u64;

        if state.explicit {
            state.saved.extend(pending);
        } else {
            publish(&self.store, &pending).await?;
        }

        debug!(saved, "Unit of work saved");
        Ok(saved)
    }

    async fn commit(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.explicit {
            return Err(AppError::invalid_operation("No transaction in progress"));
        }
        if !state.pending.is_empty() {
            warn!(
                unsaved = state.pending.len(),
                "Committing without saving; discarding unsaved writes"
            );
        }
        let saved = std::mem::take(&mut state.saved);
        state.pending.clear();
        state.explicit = false;

        publish(&self.store, &saved).await
    }

    async fn rollback(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.explicit {
            return Err(AppError::invalid_operation("No transaction in progress"));
        }
        state.saved.clear();
        state.pending.clear();
        state.explicit = false;
        Ok(())
    }
}
