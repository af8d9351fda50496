//! Statements shared by every table-backed repository.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, Postgres, QueryBuilder};

use fleet_core::result::AppResult;
use fleet_core::traits::Entity;
use fleet_core::types::{FilterField, PageRequest, PageResponse};

use super::filter::push_filters;
use super::scope::PgScope;
use crate::error::db_error;

/// Read and delete operations for one table whose rows map to `E`.
#[derive(Debug, Clone)]
pub(crate) struct Table<E> {
    name: &'static str,
    _entity: std::marker::PhantomData<fn() -> E>,
}

impl<E> Table<E>
where
    E: Entity + for<'r> FromRow<'r, PgRow> + Unpin,
{
    pub(crate) const fn new(name: &'static str) -> Self {
        Self {
            name,
            _entity: std::marker::PhantomData,
        }
    }

    pub(crate) async fn find_by_id(&self, scope: &PgScope, id: i64) -> AppResult<Option<E>> {
        let sql = format!("SELECT * FROM {} WHERE id = $1", self.name);
        let mut conn = scope.reader().await?;
        sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(conn.conn())
            .await
            .map_err(db_error(format!("Failed to find {} {id}", E::NAME)))
    }

    pub(crate) async fn find_all(&self, scope: &PgScope) -> AppResult<Vec<E>> {
        let sql = format!("SELECT * FROM {} ORDER BY id", self.name);
        let mut conn = scope.reader().await?;
        sqlx::query_as::<_, E>(&sql)
            .fetch_all(conn.conn())
            .await
            .map_err(db_error(format!("Failed to list {} records", E::NAME)))
    }

    pub(crate) async fn find(&self, scope: &PgScope, filters: &[FilterField]) -> AppResult<Vec<E>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT * FROM {}", self.name));
        push_filters(&mut builder, filters, E::FILTERABLE)?;
        builder.push(" ORDER BY id");

        let mut conn = scope.reader().await?;
        builder
            .build_query_as::<E>()
            .fetch_all(conn.conn())
            .await
            .map_err(db_error(format!("Failed to query {} records", E::NAME)))
    }

    pub(crate) async fn delete(&self, scope: &PgScope, id: i64) -> AppResult<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.name);
        let mut conn = scope.writer().await?;
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(conn.conn())
            .await
            .map_err(db_error(format!("Failed to delete {} {id}", E::NAME)))?;
        Ok(result.rows_affected() > 0)
    }

    pub(crate) async fn exists(&self, scope: &PgScope, id: i64) -> AppResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", self.name);
        let mut conn = scope.reader().await?;
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(id)
            .fetch_one(conn.conn())
            .await
            .map_err(db_error(format!("Failed to check {} {id}", E::NAME)))
    }

    pub(crate) async fn count(&self, scope: &PgScope) -> AppResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", self.name);
        let mut conn = scope.reader().await?;
        let total: i64 = sqlx::query_scalar(&sql)
            .fetch_one(conn.conn())
            .await
            .map_err(db_error(format!("Failed to count {} records", E::NAME)))?;
        Ok(total as u64)
    }

    pub(crate) async fn find_page(
        &self,
        scope: &PgScope,
        page: &PageRequest,
    ) -> AppResult<PageResponse<E>> {
        let total = self.count(scope).await?;

        let sql = format!("SELECT * FROM {} ORDER BY id LIMIT $1 OFFSET $2", self.name);
        let mut conn = scope.reader().await?;
        let items = sqlx::query_as::<_, E>(&sql)
            .bind(page.limit() as i64)
            .bind(page.offset() as i64)
            .fetch_all(conn.conn())
            .await
            .map_err(db_error(format!("Failed to page {} records", E::NAME)))?;

        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }
}
