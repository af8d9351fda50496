//! PostgreSQL unit of work.
//!
//! Saved work inside an explicit transaction is marked with a savepoint,
//! so a commit can drop whatever was written after the last save.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_core::traits::Repository;
use fleet_entity::{Administrator, Vehicle};

use super::administrator::PgAdministratorRepository;
use super::scope::{PgScope, TxState};
use super::vehicle::PgVehicleRepository;
use crate::error::db_error;
use crate::store::UnitOfWork;

const SAVEPOINT: &str = "unit_of_work_saved";

/// Unit of work over a single PostgreSQL transaction.
pub struct PgUnitOfWork {
    pool: PgPool,
    state: Arc<Mutex<TxState>>,
    vehicles: PgVehicleRepository,
    administrators: PgAdministratorRepository,
}

impl PgUnitOfWork {
    /// Create a unit of work drawing its connection from `pool`.
    pub fn new(pool: PgPool) -> Self {
        let state = Arc::new(Mutex::new(TxState::default()));
        let scope = PgScope::Unit {
            pool: pool.clone(),
            state: Arc::clone(&state),
        };
        Self {
            pool,
            state,
            vehicles: PgVehicleRepository::scoped(scope.clone()),
            administrators: PgAdministratorRepository::scoped(scope),
        }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
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
        if state.pending > 0 || state.tx.is_some() {
            return Err(AppError::invalid_operation(
                "Save pending changes before beginning a transaction",
            ));
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to begin transaction"))?;
        sqlx::query(&format!("SAVEPOINT {SAVEPOINT}"))
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to create savepoint"))?;

        state.tx = Some(tx);
        state.explicit = true;
        Ok(())
    }

    async fn save_changes(&self) -> AppResult<u64> {
        let mut state = self.state.lock().await;
        let saved = state.pending;
        state.pending = 0;

        if state.explicit {
            if let Some(tx) = state.tx.as_mut() {
                sqlx::query(&format!("SAVEPOINT {SAVEPOINT}"))
                    .execute(&mut **tx)
                    .await
                    .map_err(db_error("Failed to save changes"))?;
            }
        } else if let Some(tx) = state.tx.take() {
            tx.commit().await.map_err(db_error("Failed to save changes"))?;
        }

        debug!(saved, "Unit of work saved");
        Ok(saved)
    }

    async fn commit(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.explicit {
            return Err(AppError::invalid_operation("No transaction in progress"));
        }
        let unsaved = state.pending;
        state.explicit = false;
        state.pending = 0;

        let Some(mut tx) = state.tx.take() else {
            return Err(AppError::invalid_operation("No transaction in progress"));
        };
        if unsaved > 0 {
            warn!(unsaved, "Committing without saving; discarding unsaved writes");
            sqlx::query(&format!("ROLLBACK TO SAVEPOINT {SAVEPOINT}"))
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to discard unsaved writes"))?;
        }
        tx.commit().await.map_err(db_error("Failed to commit transaction"))
    }

    async fn rollback(&self) -> AppResult<()> {
        let mut state = self.state.lock().await;
        if !state.explicit {
            return Err(AppError::invalid_operation("No transaction in progress"));
        }
        state.explicit = false;
        state.pending = 0;
        match state.tx.take() {
            Some(tx) => tx
                .rollback()
                .await
                .map_err(db_error("Failed to roll back transaction")),
            None => Ok(()),
        }
    }
}
