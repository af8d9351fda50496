//! Row storage for the memory provider.

use std::collections::BTreeMap;

use chrono::Utc;

use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_core::traits::Entity;
use fleet_entity::{Administrator, Vehicle};

/// Rows of one entity type keyed by id, plus the id sequence.
#[derive(Debug, Clone)]
pub struct MemoryTable<E> {
    rows: BTreeMap<i64, E>,
    next_id: i64,
}

impl<E> Default for MemoryTable<E> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<E: Entity> MemoryTable<E> {
    pub(crate) fn get(&self, id: i64) -> Option<&E> {
        self.rows.get(&id)
    }

    pub(crate) fn rows(&self) -> impl Iterator<Item = &E> {
        self.rows.values()
    }

    pub(crate) fn len(&self) -> usize {
        self.rows.len()
    }

    pub(crate) fn insert(&mut self, draft: &E::Draft) -> AppResult<E> {
        let entity = E::from_draft(self.next_id, draft, Utc::now());
        self.ensure_unique(&entity)?;
        self.next_id += 1;
        self.rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    /// Take the next id without storing a row.
    pub(crate) fn reserve_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Store a row whose id was reserved earlier.
    pub(crate) fn put(&mut self, entity: E) -> AppResult<E> {
        if self.rows.contains_key(&entity.id()) {
            return Err(AppError::conflict(format!(
                "{} {} already exists",
                E::NAME,
                entity.id()
            )));
        }
        self.ensure_unique(&entity)?;
        self.next_id = self.next_id.max(entity.id() + 1);
        self.rows.insert(entity.id(), entity.clone());
        Ok(entity)
    }

    pub(crate) fn replace(&mut self, entity: &E) -> AppResult<E> {
        if !self.rows.contains_key(&entity.id()) {
            return Err(AppError::not_found(format!(
                "{} {} not found",
                E::NAME,
                entity.id()
            )));
        }
        self.ensure_unique(entity)?;
        let mut stored = entity.clone();
        stored.touch(Utc::now());
        self.rows.insert(stored.id(), stored.clone());
        Ok(stored)
    }

    pub(crate) fn remove(&mut self, id: i64) -> bool {
        self.rows.remove(&id).is_some()
    }

    fn ensure_unique(&self, entity: &E) -> AppResult<()> {
        let Some(key) = entity.unique_key() else {
            return Ok(());
        };
        let clash = self
            .rows
            .values()
            .any(|row| row.id() != entity.id() && row.unique_key().as_deref() == Some(key.as_str()));
        if clash {
            return Err(AppError::conflict(format!(
                "A {} with the same key already exists",
                E::NAME
            )));
        }
        Ok(())
    }
}

/// Every table held by the memory provider.
#[derive(Debug, Clone, Default)]
pub struct MemoryTables {
    /// Vehicle rows.
    pub vehicles: MemoryTable<Vehicle>,
    /// Administrator rows.
    pub administrators: MemoryTable<Administrator>,
}

/// Locates an entity's table inside [`MemoryTables`].
pub trait MemoryEntity: Entity {
    /// Shared view of the table.
    fn table(tables: &MemoryTables) -> &MemoryTable<Self>;
    /// Mutable view of the table.
    fn table_mut(tables: &mut MemoryTables) -> &mut MemoryTable<Self>;
}

impl MemoryEntity for Vehicle {
    fn table(tables: &MemoryTables) -> &MemoryTable<Self> {
        &tables.vehicles
    }

    fn table_mut(tables: &mut MemoryTables) -> &mut MemoryTable<Self> {
        &mut tables.vehicles
    }
}

impl MemoryEntity for Administrator {
    fn table(tables: &MemoryTables) -> &MemoryTable<Self> {
        &tables.administrators
    }

    fn table_mut(tables: &mut MemoryTables) -> &mut MemoryTable<Self> {
        &mut tables.administrators
    }
}
