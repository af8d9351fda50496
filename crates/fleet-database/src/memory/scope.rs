//! Visibility rules for memory repositories.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};

use fleet_core::result::AppResult;

use super::table::{MemoryEntity, MemoryTables};

/// A recorded write, replayed onto whichever tables it is applied to.
pub(crate) type Change = Box<dyn Fn(&mut MemoryTables) -> AppResult<()> + Send + Sync>;

/// Change log for one unit of work.
#[derive(Default)]
pub(crate) struct UnitState {
    /// Saved inside an explicit transaction, published on commit.
    pub(crate) saved: Vec<Change>,
    /// Issued since the last save.
    pub(crate) pending: Vec<Change>,
    pub(crate) explicit: bool,
}

impl std::fmt::Debug for UnitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnitState")
            .field("saved", &self.saved.len())
            .field("pending", &self.pending.len())
            .field("explicit", &self.explicit)
            .finish()
    }
}

impl UnitState {
    fn is_clean(&self) -> bool {
        self.saved.is_empty() && self.pending.is_empty()
    }

    /// The shared tables as this unit sees them. Changes that no longer
    /// apply are skipped here; publishing reports them.
    fn overlay(&self, shared: &MemoryTables) -> MemoryTables {
        let mut view = shared.clone();
        for change in self.saved.iter().chain(&self.pending) {
            let _ = change(&mut view);
        }
        view
    }

    fn record(&mut self, change: impl Fn(&mut MemoryTables) -> AppResult<()> + Send + Sync + 'static) {
        self.pending.push(Box::new(change));
    }
}

/// Apply `changes` to the shared tables as one step: all of them or none.
pub(crate) async fn publish(store: &RwLock<MemoryTables>, changes: &[Change]) -> AppResult<()> {
    if changes.is_empty() {
        return Ok(());
    }
    let mut tables = store.write().await;
    let mut next = tables.clone();
    for change in changes {
        change(&mut next)?;
    }
    *tables = next;
    Ok(())
}

/// Where a memory repository reads and writes.
#[derive(Debug, Clone)]
pub(crate) enum MemoryScope {
    /// Directly against the shared tables.
    Shared(Arc<RwLock<MemoryTables>>),
    /// Through a unit of work's change log.
    Unit {
        store: Arc<RwLock<MemoryTables>>,
        state: Arc<Mutex<UnitState>>,
    },
}

impl MemoryScope {
    pub(crate) async fn read<R>(&self, f: impl FnOnce(&MemoryTables) -> R + Send) -> R {
        match self {
            Self::Shared(store) => f(&*store.read().await),
            Self::Unit { store, state } => {
                let unit = state.lock().await;
                let shared = store.read().await;
                if unit.is_clean() {
                    return f(&*shared);
                }
                let view = unit.overlay(&shared);
                drop(shared);
                f(&view)
            }
        }
    }

    pub(crate) async fn insert<E: MemoryEntity>(&self, draft: &E::Draft) -> AppResult<E> {
        match self {
            Self::Shared(store) => E::table_mut(&mut *store.write().await).insert(draft),
            Self::Unit { store, state } => {
                let mut unit = state.lock().await;
                // Ids come from the shared sequence, as a database sequence would hand them out.
                let id = E::table_mut(&mut *store.write().await).reserve_id();
                let entity = E::from_draft(id, draft, Utc::now());

                let mut view = unit.overlay(&*store.read().await);
                E::table_mut(&mut view).put(entity.clone())?;

                let row = entity.clone();
                unit.record(move |t| E::table_mut(t).put(row.clone()).map(drop));
                Ok(entity)
            }
        }
    }

    pub(crate) async fn replace<E: MemoryEntity>(&self, entity: &E) -> AppResult<E> {
        match self {
            Self::Shared(store) => E::table_mut(&mut *store.write().await).replace(entity),
            Self::Unit { store, state } => {
                let mut unit = state.lock().await;
                let mut view = unit.overlay(&*store.read().await);
                let stored = E::table_mut(&mut view).replace(entity)?;

                let row = stored.clone();
                unit.record(move |t| E::table_mut(t).replace(&row).map(drop));
                Ok(stored)
            }
        }
    }

    pub(crate) async fn remove<E: MemoryEntity>(&self, id: i64) -> AppResult<bool> {
        match self {
            Self::Shared(store) => Ok(E::table_mut(&mut *store.write().await).remove(id)),
            Self::Unit { store, state } => {
                let mut unit = state.lock().await;
                let view = unit.overlay(&*store.read().await);
                if E::table(&view).get(id).is_none() {
                    return Ok(false);
                }
                unit.record(move |t| {
                    E::table_mut(t).remove(id);
                    Ok(())
                });
                Ok(true)
            }
        }
    }
}
