//! Memory-backed [`DataStore`].

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use fleet_core::result::AppResult;
use fleet_core::traits::Repository;
use fleet_entity::{Administrator, Vehicle};

use super::repository::MemoryRepository;
use super::scope::MemoryScope;
use super::table::MemoryTables;
use super::unit_of_work::MemoryUnitOfWork;
use crate::store::{DataStore, UnitOfWork};

/// Data store that lives entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryDataStore {
    tables: Arc<RwLock<MemoryTables>>,
}

impl MemoryDataStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DataStore for MemoryDataStore {
    fn provider(&self) -> &'static str {
        "memory"
    }

    fn vehicles(&self) -> Arc<dyn Repository<Vehicle>> {
        Arc::new(MemoryRepository::<Vehicle>::new(MemoryScope::Shared(
            Arc::clone(&self.tables),
        )))
    }

    fn administrators(&self) -> Arc<dyn Repository<Administrator>> {
        Arc::new(MemoryRepository::<Administrator>::new(MemoryScope::Shared(
            Arc::clone(&self.tables),
        )))
    }

    fn unit_of_work(&self) -> Box<dyn UnitOfWork> {
        Box::new(MemoryUnitOfWork::new(Arc::clone(&self.tables)))
    }

    async fn ping(&self) -> AppResult<()> {
        let _tables = self.tables.read().await;
        Ok(())
    }

    async fn maintenance(&self) -> AppResult<()> {
        Ok(())
    }

    async fn close(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_core::error::ErrorKind;
    use fleet_core::types::{FilterField, PageRequest};
    use fleet_entity::NewVehicle;

    fn civic() -> NewVehicle {
        NewVehicle {
            name: "Civic".into(),
            brand: "Honda".into(),
            year: 2020,
        }
    }

    fn fusca() -> NewVehicle {
        NewVehicle {
            name: "Fusca".into(),
            brand: "Volkswagen".into(),
            year: 1970,
        }
    }

    #[tokio::test]
    async fn test_repository_crud() {
        let store = MemoryDataStore::new();
        let repo = store.vehicles();

        let created = repo.add(&civic()).await.unwrap();
        assert_eq!(created.id, 1);
        assert!(repo.exists(1).await.unwrap());

        let mut changed = created.clone();
        changed.year = 2021;
        let updated = repo.update(&changed).await.unwrap();
        assert_eq!(updated.year, 2021);
        assert!(updated.updated_at >= created.updated_at);

        assert!(repo.delete(1).await.unwrap());
        assert!(!repo.delete(1).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_find_and_pages() {
        let store = MemoryDataStore::new();
        let repo = store.vehicles();
        for _ in 0..12 {
            repo.add(&civic()).await.unwrap();
        }
        repo.add(&fusca()).await.unwrap();

        let found = repo.find(&[FilterField::contains("brand", "wagen")]).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Fusca");

        let page = repo.find_page(&PageRequest::new(2, 10)).await.unwrap();
        assert_eq!(page.items.len(), 3);
        assert_eq!(page.items[0].id, 11);
        assert_eq!(page.total_items, 13);

        let err = repo.find(&[FilterField::eq("color", "red")]).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_unit_writes_invisible_until_saved() {
        let store = MemoryDataStore::new();
        let uow = store.unit_of_work();

        let added = uow.vehicles().add(&civic()).await.unwrap();
        assert!(uow.vehicles().exists(added.id).await.unwrap());
        assert_eq!(store.vehicles().count().await.unwrap(), 0);

        assert_eq!(uow.save_changes().await.unwrap(), 1);
        assert_eq!(store.vehicles().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_dropped_unit_discards_writes() {
        let store = MemoryDataStore::new();
        {
            let uow = store.unit_of_work();
            uow.vehicles().add(&civic()).await.unwrap();
        }
        assert_eq!(store.vehicles().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_keeps_only_saved_writes() {
        let store = MemoryDataStore::new();
        let uow = store.unit_of_work();
        uow.begin().await.unwrap();

        uow.vehicles().add(&civic()).await.unwrap();
        uow.save_changes().await.unwrap();
        assert_eq!(store.vehicles().count().await.unwrap(), 0);

        uow.vehicles().add(&fusca()).await.unwrap();
        uow.commit().await.unwrap();

        let rows = store.vehicles().find_all().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Civic");
    }

    #[tokio::test]
    async fn test_rollback_discards_saved_writes() {
        let store = MemoryDataStore::new();
        let uow = store.unit_of_work();
        uow.begin().await.unwrap();
        uow.vehicles().add(&civic()).await.unwrap();
        uow.save_changes().await.unwrap();
        uow.rollback().await.unwrap();

        assert_eq!(store.vehicles().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_transaction_state_errors() {
        let store = MemoryDataStore::new();
        let uow = store.unit_of_work();

        let err = uow.commit().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOperation);
        let err = uow.rollback().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOperation);

        uow.begin().await.unwrap();
        let err = uow.begin().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOperation);
    }

    #[tokio::test]
    async fn test_begin_refuses_unsaved_writes() {
        let store = MemoryDataStore::new();
        let uow = store.unit_of_work();
        uow.vehicles().add(&civic()).await.unwrap();

        let err = uow.begin().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidOperation);
    }

    #[tokio::test]
    async fn test_interleaved_units_keep_both_rows() {
        let store = MemoryDataStore::new();
        let first = store.unit_of_work();
        let second = store.unit_of_work();

        let a = first.vehicles().add(&civic()).await.unwrap();
        let b = second.vehicles().add(&fusca()).await.unwrap();
        assert_ne!(a.id, b.id);

        first.save_changes().await.unwrap();
        second.save_changes().await.unwrap();

        let mut names: Vec<_> = store
            .vehicles()
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|v| (v.id, v.name))
            .collect();
        names.sort();
        assert_eq!(names, vec![(a.id, "Civic".to_string()), (b.id, "Fusca".to_string())]);
    }

    #[tokio::test]
    async fn test_commit_preserves_concurrent_shared_writes() {
        use fleet_entity::{NewAdministrator, Role};

        let store = MemoryDataStore::new();
        let uow = store.unit_of_work();
        uow.begin().await.unwrap();

        store.vehicles().add(&civic()).await.unwrap();
        uow.administrators()
            .add(&NewAdministrator {
                email: "adm@teste.com".into(),
                password_hash: "x".into(),
                role: Role::Admin,
            })
            .await
            .unwrap();
        uow.save_changes().await.unwrap();
        uow.commit().await.unwrap();

        assert_eq!(store.vehicles().count().await.unwrap(), 1);
        assert_eq!(store.administrators().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_uniqueness_rechecked_when_saving() {
        use fleet_entity::{NewAdministrator, Role};

        let draft = NewAdministrator {
            email: "adm@teste.com".into(),
            password_hash: "x".into(),
            role: Role::Editor,
        };
        let store = MemoryDataStore::new();
        let first = store.unit_of_work();
        let second = store.unit_of_work();

        first.administrators().add(&draft).await.unwrap();
        second.administrators().add(&draft).await.unwrap();
        first.save_changes().await.unwrap();

        let err = second.save_changes().await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(store.administrators().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unit_sees_own_delete_and_update() {
        let store = MemoryDataStore::new();
        let kept = store.vehicles().add(&civic()).await.unwrap();
        let gone = store.vehicles().add(&fusca()).await.unwrap();

        let uow = store.unit_of_work();
        let mut changed = kept.clone();
        changed.year = 2022;
        uow.vehicles().update(&changed).await.unwrap();
        assert!(uow.vehicles().delete(gone.id).await.unwrap());
        assert!(!uow.vehicles().exists(gone.id).await.unwrap());
        assert!(store.vehicles().exists(gone.id).await.unwrap());

        uow.save_changes().await.unwrap();
        assert!(!store.vehicles().exists(gone.id).await.unwrap());
        let stored = store.vehicles().find_by_id(kept.id).await.unwrap().unwrap();
        assert_eq!(stored.year, 2022);
    }
}
