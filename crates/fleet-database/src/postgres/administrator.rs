//! Administrator repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_core::traits::Repository;
use fleet_core::types::{FilterField, PageRequest, PageResponse};
use fleet_entity::{Administrator, NewAdministrator};

use super::scope::PgScope;
use super::table::Table;
use crate::error::db_error;

const ADMINISTRATORS: Table<Administrator> = Table::new("administrators");

/// Repository for the `administrators` table.
#[derive(Debug, Clone)]
pub struct PgAdministratorRepository {
    scope: PgScope,
}

impl PgAdministratorRepository {
    /// Create an auto-committing repository.
    pub fn new(pool: PgPool) -> Self {
        Self {
            scope: PgScope::Pool(pool),
        }
    }

    pub(crate) fn scoped(scope: PgScope) -> Self {
        Self { scope }
    }
}

#[async_trait]
impl Repository<Administrator> for PgAdministratorRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Administrator>> {
        ADMINISTRATORS.find_by_id(&self.scope, id).await
    }

    async fn find_all(&self) -> AppResult<Vec<Administrator>> {
        ADMINISTRATORS.find_all(&self.scope).await
    }

    async fn find(&self, filters: &[FilterField]) -> AppResult<Vec<Administrator>> {
        ADMINISTRATORS.find(&self.scope, filters).await
    }

    async fn add(&self, draft: &NewAdministrator) -> AppResult<Administrator> {
        let mut conn = self.scope.writer().await?;
        sqlx::query_as::<_, Administrator>(
            "INSERT INTO administrators (email, password_hash, role) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(draft.email.to_lowercase())
        .bind(&draft.password_hash)
        .bind(draft.role)
        .fetch_one(conn.conn())
        .await
        .map_err(db_error("Failed to insert administrator"))
    }

    async fn update(&self, admin: &Administrator) -> AppResult<Administrator> {
        let mut conn = self.scope.writer().await?;
        sqlx::query_as::<_, Administrator>(
            "UPDATE administrators SET email = $2, password_hash = $3, role = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(admin.id)
        .bind(admin.email.to_lowercase())
        .bind(&admin.password_hash)
        .bind(admin.role)
        .fetch_optional(conn.conn())
        .await
        .map_err(db_error(format!("Failed to update administrator {}", admin.id)))?
        .ok_or_else(|| AppError::not_found(format!("Administrator {} not found", admin.id)))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        ADMINISTRATORS.delete(&self.scope, id).await
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        ADMINISTRATORS.exists(&self.scope, id).await
    }

    async fn count(&self) -> AppResult<u64> {
        ADMINISTRATORS.count(&self.scope).await
    }

    async fn find_page(&self, page: &PageRequest) -> AppResult<PageResponse<Administrator>> {
        ADMINISTRATORS.find_page(&self.scope, page).await
    }
}
