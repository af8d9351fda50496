//! Vehicle repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_core::traits::Repository;
use fleet_core::types::{FilterField, PageRequest, PageResponse};
use fleet_entity::{NewVehicle, Vehicle};

use super::scope::PgScope;
use super::table::Table;
use crate::error::db_error;

const VEHICLES: Table<Vehicle> = Table::new("vehicles");

/// Repository for the `vehicles` table.
#[derive(Debug, Clone)]
pub struct PgVehicleRepository {
    scope: PgScope,
}

impl PgVehicleRepository {
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
impl Repository<Vehicle> for PgVehicleRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Vehicle>> {
        VEHICLES.find_by_id(&self.scope, id).await
    }

    async fn find_all(&self) -> AppResult<Vec<Vehicle>> {
        VEHICLES.find_all(&self.scope).await
    }

    async fn find(&self, filters: &[FilterField]) -> AppResult<Vec<Vehicle>> {
        VEHICLES.find(&self.scope, filters).await
    }

    async fn add(&self, draft: &NewVehicle) -> AppResult<Vehicle> {
        let mut conn = self.scope.writer().await?;
        sqlx::query_as::<_, Vehicle>(
            "INSERT INTO vehicles (name, brand, year) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&draft.name)
        .bind(&draft.brand)
        .bind(draft.year)
        .fetch_one(conn.conn())
        .await
        .map_err(db_error("Failed to insert vehicle"))
    }

    async fn update(&self, vehicle: &Vehicle) -> AppResult<Vehicle> {
        let mut conn = self.scope.writer().await?;
        sqlx::query_as::<_, Vehicle>(
            "UPDATE vehicles SET name = $2, brand = $3, year = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(vehicle.id)
        .bind(&vehicle.name)
        .bind(&vehicle.brand)
        .bind(vehicle.year)
        .fetch_optional(conn.conn())
        .await
        .map_err(db_error(format!("Failed to update vehicle {}", vehicle.id)))?
        .ok_or_else(|| AppError::not_found(format!("Vehicle {} not found", vehicle.id)))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        VEHICLES.delete(&self.scope, id).await
    }

    async fn exists(&self, id: i64) -> AppResult<bool> {
        VEHICLES.exists(&self.scope, id).await
    }

    async fn count(&self) -> AppResult<u64> {
        VEHICLES.count(&self.scope).await
    }

    async fn find_page(&self, page: &PageRequest) -> AppResult<PageResponse<Vehicle>> {
        VEHICLES.find_page(&self.scope, page).await
    }
}
