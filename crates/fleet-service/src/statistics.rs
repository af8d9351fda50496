//! Aggregate figures shown on the statistics endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use fleet_cache::{CacheService, keys};
use fleet_core::result::AppResult;
use fleet_database::DatabaseManager;

/// API version reported to clients.
pub const API_VERSION: &str = "v1.0";

const FEATURES: &[&str] = &[
    "Gerenciamento de Veículos",
    "Autenticação JWT",
    "Controle de Acesso por Roles",
    "Paginação de Resultados",
    "Validações Automáticas",
    "Rate Limiting",
    "Health Checks",
];

/// Statistics document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_veiculos: u64,
    pub total_administradores: u64,
    #[serde(rename = "versaoAPI")]
    pub versao_api: String,
    pub data_consulta: DateTime<Utc>,
    pub funcionalidades_disponiveis: Vec<String>,
}

/// Computes and caches [`Statistics`].
#[derive(Debug, Clone)]
pub struct StatisticsService {
    db: DatabaseManager,
    cache: CacheService,
}

impl StatisticsService {
    /// Creates a new statistics service.
    pub fn new(db: DatabaseManager, cache: CacheService) -> Self {
        Self { db, cache }
    }

    /// Cached statistics, computed on a miss.
    pub async fn current(&self) -> AppResult<Statistics> {
        if let Some(cached) = self.cache.get::<Statistics>(keys::statistics()).await {
            return Ok(cached);
        }
        self.refresh().await
    }

    /// Recompute and overwrite the cached entry.
    pub async fn refresh(&self) -> AppResult<Statistics> {
        let stats = Statistics {
            total_veiculos: self.db.vehicles().count().await?,
            total_administradores: self.db.administrators().count().await?,
            versao_api: API_VERSION.to_string(),
            data_consulta: Utc::now(),
            funcionalidades_disponiveis: FEATURES.iter().map(|f| f.to_string()).collect(),
        };
        self.cache.set(keys::statistics(), &stats, None).await;
        debug!(
            vehicles = stats.total_veiculos,
            administrators = stats.total_administradores,
            "Statistics refreshed"
        );
        Ok(stats)
    }
}
