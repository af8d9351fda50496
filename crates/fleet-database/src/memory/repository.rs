//! Generic repository over a memory table.

use std::marker::PhantomData;

use async_trait::async_trait;

use fleet_core::result::AppResult;
use fleet_core::traits::Repository;
use fleet_core::types::{FilterField, PageRequest, PageResponse};

use super::scope::MemoryScope;
use super::table::MemoryEntity;

/// Repository for any entity stored by the memory provider.
#[derive(Debug, Clone)]
pub struct MemoryRepository<E> {
    scope: MemoryScope,
    _entity: PhantomData<fn() -> E>,
}

impl<E: MemoryEntity> MemoryRepository<E> {
    pub(crate) fn new(scope: MemoryScope) -> Self {
        Self {
            scope,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<E: MemoryEntity> Repository<E> for MemoryRepository<E> {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<E>> {
        Ok(self.scope.read(|t| E::table(t).get(id).cloned()).await)
    }

    async fn find_all(&self) -> AppResult<Vec<E>> {
        Ok(self
            .scope
            .read(|t| E::table(t).rows().cloned().collect())
            .await)
    }

    async fn find(&self, filters: &[FilterField]) -> AppResult<Vec<E>> {
        for filter in filters {
            if !E::FILTERABLE.contains(&filter.field.as_str()) {
                return Err(fleet_core::AppError::validation(format!(
                    "Unknown filter field '{}'",
                    filter.field
                )));
            }
        }
        Ok(self
            .scope
            .read(|t| {
                E::table(t)
                    .rows()
                    .filter(|row| {
                        filters
                            .iter()
                            .all(|f| f.matches(row.field(&f.field).as_ref()))
                    })
                    .cloned()
                    .collect()
            })
            .await)
    }

    async fn add(&self, draft: &E::Draft) -> AppResult<E> {
        self.scope.insert::<E>(draft).await
    }

    async fn update(&self, entity: &E) -> AppResult<E> {
        self.scope.replace(entity).await
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        self.scope.remove::<E>(id).await
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        Ok(self.scope.read(|t| E::table(t).get(id).is_some()).await)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.scope.read(|t| E::table(t).len() as u64).await)
    }

    async fn find_page(&self, page: &PageRequest) -> AppResult<PageResponse<E>> {
        let (items, total) = self
            .scope
            .read(|t| {
                let table = E::table(t);
                let items = table
                    .rows()
                    .skip(page.offset() as usize)
                    .take(page.limit() as usize)
                    .cloned()
                    .collect::<Vec<_>>();
                (items, table.len() as u64)
            })
            .await;
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }
}
