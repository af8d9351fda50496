//! Generic repository capability for database access.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::result::AppResult;
use crate::types::filter::{FilterField, FilterValue};
use crate::types::pagination::{PageRequest, PageResponse};

/// A persistent record addressed by a store-generated integer key.
///
/// Implemented by every entity a [`Repository`] can hold. The accessors
/// let storage backends that do not speak SQL evaluate filters and
/// enforce uniqueness the same way the relational schema does.
pub trait Entity: Clone + Send + Sync + Serialize + std::fmt::Debug + 'static {
    /// The data needed to insert a new record (everything but the key).
    type Draft: Clone + Send + Sync + std::fmt::Debug + 'static;

    /// Human-readable entity name used in log and error messages.
    const NAME: &'static str;

    /// Fields that may appear in a [`FilterField`].
    const FILTERABLE: &'static [&'static str];

    /// Primary key.
    fn id(&self) -> i64;

    /// Build a stored record from a draft and a freshly assigned key.
    fn from_draft(id: i64, draft: &Self::Draft, now: DateTime<Utc>) -> Self;

    /// Read a field for filter evaluation.
    fn field(&self, name: &str) -> Option<FilterValue>;

    /// Value that must be unique across the table, if any.
    fn unique_key(&self) -> Option<String> {
        None
    }

    /// Stamp modification metadata before an update is stored.
    fn touch(&mut self, _now: DateTime<Utc>) {}
}

/// Generic CRUD repository over one entity table.
///
/// Every operation is fallible; failures are logged by the implementation
/// and propagated unchanged to the caller.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync + 'static {
    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>>;

    /// Return every entity ordered by key.
    async fn find_all(&self) -> AppResult<Vec<E>>;

    /// Return the entities matching every filter, ordered by key.
    async fn find(&self, filters: &[FilterField]) -> AppResult<Vec<E>>;

    /// Insert a new entity and return it with its generated key.
    async fn add(&self, draft: &E::Draft) -> AppResult<E>;

    /// Replace an existing entity and return the stored version.
    async fn update(&self, entity: &E) -> AppResult<E>;

    /// Delete an entity by its primary key. Returns `true` if deleted.
    async fn delete(&self, id: i64) -> AppResult<bool>;

    /// Whether an entity with this key exists.
    async fn exists(&self, id: i64) -> AppResult<bool>;

    /// Count total entities.
    async fn count(&self) -> AppResult<u64>;

    /// Return one page of entities ordered by key.
    async fn find_page(&self, page: &PageRequest) -> AppResult<PageResponse<E>>;
}
