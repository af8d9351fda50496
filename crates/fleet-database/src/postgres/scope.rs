//! Connection scoping shared by repositories and units of work.

use std::sync::Arc;

use sqlx::pool::PoolConnection;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

use fleet_core::error::AppError;
use fleet_core::result::AppResult;

use crate::error::db_error;

/// Transaction bookkeeping for one unit of work.
#[derive(Default)]
pub(crate) struct TxState {
    /// Open transaction, started explicitly or by the first write.
    pub(crate) tx: Option<Transaction<'static, Postgres>>,
    /// Whether `begin` opened the transaction.
    pub(crate) explicit: bool,
    /// Writes issued since the last save.
    pub(crate) pending: u64,
}

/// Where a repository sends its statements.
#[derive(Clone)]
pub(crate) enum PgScope {
    /// Auto-commit on pooled connections.
    Pool(PgPool),
    /// Inside a unit of work: writes go to its transaction, reads follow
    /// them there once one is open.
    Unit {
        pool: PgPool,
        state: Arc<Mutex<TxState>>,
    },
}

impl std::fmt::Debug for PgScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pool(_) => write!(f, "PgScope::Pool"),
            Self::Unit { .. } => write!(f, "PgScope::Unit"),
        }
    }
}

/// A connection borrowed for one statement.
pub(crate) enum ScopedConnection<'a> {
    Pooled(PoolConnection<Postgres>),
    Transaction(MappedMutexGuard<'a, Transaction<'static, Postgres>>),
}

impl ScopedConnection<'_> {
    pub(crate) fn conn(&mut self) -> &mut PgConnection {
        match self {
            Self::Pooled(conn) => &mut **conn,
            Self::Transaction(tx) => &mut ***tx,
        }
    }
}

impl PgScope {
    /// Connection for a read.
    pub(crate) async fn reader(&self) -> AppResult<ScopedConnection<'_>> {
        match self {
            Self::Pool(pool) => pooled(pool).await,
            Self::Unit { pool, state } => {
                let guard = state.lock().await;
                let _guard = match MutexGuard::try_map(guard, |s| s.tx.as_mut()) {
                    Ok(tx) => return Ok(ScopedConnection::Transaction(tx)),
                    Err(guard) => guard,
                };
                pooled(pool).await
            }
        }
    }

    /// Connection for a write. Inside a unit of work this opens the
    /// transaction on first use and counts the write as pending.
    pub(crate) async fn writer(&self) -> AppResult<ScopedConnection<'_>> {
        match self {
            Self::Pool(pool) => pooled(pool).await,
            Self::Unit { pool, state } => {
                let mut guard = state.lock().await;
                if guard.tx.is_none() {
                    let tx = pool.begin().await.map_err(db_error("Failed to begin transaction"))?;
                    guard.tx = Some(tx);
                }
                guard.pending += 1;
                MutexGuard::try_map(guard, |s| s.tx.as_mut())
                    .map(ScopedConnection::Transaction)
                    .map_err(|_| AppError::internal("Unit of work has no open transaction"))
            }
        }
    }
}

async fn pooled(pool: &PgPool) -> AppResult<ScopedConnection<'_>> {
    let conn = pool
        .acquire()
        .await
        .map_err(db_error("Failed to acquire database connection"))?;
    Ok(ScopedConnection::Pooled(conn))
}

