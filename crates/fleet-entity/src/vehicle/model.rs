//! Vehicle entity model.

use chrono::{DateTime, Utc};
use fleet_core::traits::Entity;
use fleet_core::types::FilterValue;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Oldest manufacture year accepted.
pub const MIN_YEAR: i32 = 1950;

/// A catalogued vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Store-generated identifier.
    pub id: i64,
    /// Model name.
    pub name: String,
    /// Manufacturer.
    pub brand: String,
    /// Manufacture year.
    pub year: i32,
    /// When the vehicle was registered.
    pub created_at: DateTime<Utc>,
    /// When the vehicle was last modified.
    pub updated_at: DateTime<Utc>,
}

/// Data required to register a vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct NewVehicle {
    /// Model name.
    pub name: String,
    /// Manufacturer.
    pub brand: String,
    /// Manufacture year.
    pub year: i32,
}

impl Entity for Vehicle {
    type Draft = NewVehicle;

    const NAME: &'static str = "vehicle";
    const FILTERABLE: &'static [&'static str] = &["id", "name", "brand", "year"];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: &NewVehicle, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            brand: draft.brand.clone(),
            year: draft.year,
            created_at: now,
            updated_at: now,
        }
    }

    fn field(&self, name: &str) -> Option<FilterValue> {
        match name {
            "id" => Some(FilterValue::Integer(self.id)),
            "name" => Some(FilterValue::String(self.name.clone())),
            "brand" => Some(FilterValue::String(self.brand.clone())),
            "year" => Some(FilterValue::Integer(i64::from(self.year))),
            _ => None,
        }
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
