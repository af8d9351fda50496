//! Vehicle registration, lookup and maintenance.

use tracing::info;

use fleet_cache::{CacheService, keys};
use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_core::types::pagination::DEFAULT_PAGE_SIZE;
use fleet_core::types::{FilterField, PageRequest};
use fleet_database::DatabaseManager;
use fleet_entity::{NewVehicle, Vehicle};

/// Listing parameters.
#[derive(Debug, Clone, Default)]
pub struct VehicleQuery {
    /// 1-based page of size 10; `None` returns every match.
    pub page: Option<u64>,
    /// Case-insensitive substring of the name.
    pub name: Option<String>,
    /// Case-insensitive substring of the brand.
    pub brand: Option<String>,
}

impl VehicleQuery {
    fn filters(&self) -> Vec<FilterField> {
        let mut filters = Vec::new();
        if let Some(name) = non_blank(self.name.as_deref()) {
            filters.push(FilterField::contains("name", name));
        }
        if let Some(brand) = non_blank(self.brand.as_deref()) {
            filters.push(FilterField::contains("brand", brand));
        }
        filters
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Vehicle use cases.
#[derive(Debug, Clone)]
pub struct VehicleService {
    db: DatabaseManager,
    cache: CacheService,
}

impl VehicleService {
    /// Creates a new vehicle service.
    pub fn new(db: DatabaseManager, cache: CacheService) -> Self {
        Self { db, cache }
    }

    /// List vehicles, optionally filtered and paginated.
    ///
    /// Unfiltered pages are served from cache.
    pub async fn list(&self, query: &VehicleQuery) -> AppResult<Vec<Vehicle>> {
        let filters = query.filters();
        let repo = self.db.vehicles();

        match (query.page, filters.is_empty()) {
            (None, true) => repo.find_all().await,
            (None, false) => repo.find(&filters).await,
            (Some(page), true) => {
                let key = keys::vehicles_page(page);
                if let Some(cached) = self.cache.get::<Vec<Vehicle>>(&key).await {
                    return Ok(cached);
                }
                let items = repo
                    .find_page(&PageRequest::new(page, DEFAULT_PAGE_SIZE))
                    .await?
                    .items;
                self.cache.set(&key, &items, None).await;
                Ok(items)
            }
            (Some(page), false) => {
                let request = PageRequest::new(page, DEFAULT_PAGE_SIZE);
                Ok(repo
                    .find(&filters)
                    .await?
                    .into_iter()
                    .skip(request.offset() as usize)
                    .take(request.limit() as usize)
                    .collect())
            }
        }
    }

    /// Look up one vehicle.
    pub async fn get(&self, id: i64) -> AppResult<Option<Vehicle>> {
        let key = keys::vehicle_by_id(id);
        if let Some(cached) = self.cache.get::<Vehicle>(&key).await {
            return Ok(Some(cached));
        }

        let found = self.db.vehicles().find_by_id(id).await?;
        if let Some(vehicle) = &found {
            self.cache.set(&key, vehicle, None).await;
        }
        Ok(found)
    }

    /// Register a vehicle.
    pub async fn create(&self, draft: &NewVehicle) -> AppResult<Vehicle> {
        let uow = self.db.unit_of_work();
        let created = uow.vehicles().add(draft).await?;
        uow.save_changes().await?;

        self.invalidate(None).await;
        info!(vehicle_id = created.id, name = %created.name, brand = %created.brand, "Vehicle created");
        Ok(created)
    }

    /// Replace name, brand and year of an existing vehicle.
    pub async fn update(&self, id: i64, changes: &NewVehicle) -> AppResult<Vehicle> {
        let uow = self.db.unit_of_work();
        let mut vehicle = uow
            .vehicles()
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Vehicle {id} not found")))?;

        vehicle.name = changes.name.clone();
        vehicle.brand = changes.brand.clone();
        vehicle.year = changes.year;
        let updated = uow.vehicles().update(&vehicle).await?;
        uow.save_changes().await?;

        self.invalidate(Some(id)).await;
        info!(vehicle_id = id, "Vehicle updated");
        Ok(updated)
    }

    /// Delete a vehicle. Returns whether it existed.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let uow = self.db.unit_of_work();
        let deleted = uow.vehicles().delete(id).await?;
        uow.save_changes().await?;

        if deleted {
            self.invalidate(Some(id)).await;
            info!(vehicle_id = id, "Vehicle deleted");
        }
        Ok(deleted)
    }

    async fn invalidate(&self, id: Option<i64>) {
        if let Some(id) = id {
            self.cache.remove(&keys::vehicle_by_id(id)).await;
        }
        self.cache
            .remove_by_pattern(keys::vehicles_pages_pattern())
            .await;
        self.cache.remove(keys::statistics()).await;
    }
}
