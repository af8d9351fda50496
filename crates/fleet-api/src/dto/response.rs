//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fleet_entity::{Administrator, Role, Vehicle};

/// Vehicle as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleView {
    pub id: i64,
    pub nome: String,
    pub marca: String,
    pub ano: i32,
}

impl From<Vehicle> for VehicleView {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            nome: vehicle.name,
            marca: vehicle.brand,
            ano: vehicle.year,
        }
    }
}

/// Administrator as returned to clients. Never carries the password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdministratorView {
    pub id: i64,
    pub email: String,
    pub perfil: Role,
}

impl From<Administrator> for AdministratorView {
    fn from(admin: Administrator) -> Self {
        Self {
            id: admin.id,
            email: admin.email,
            perfil: admin.role,
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub email: String,
    pub perfil: Role,
    pub token: String,
}

/// Document served at `/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeResponse {
    pub mensagem: String,
    pub versao: String,
    pub health: String,
}

impl Default for HomeResponse {
    fn default() -> Self {
        Self {
            mensagem: "Bem vindo a API de veículos - Minimal API".to_string(),
            versao: env!("CARGO_PKG_VERSION").to_string(),
            health: "/health".to_string(),
        }
    }
}

/// Lightweight status served at `/api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiHealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}
