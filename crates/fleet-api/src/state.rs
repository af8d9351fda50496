//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use fleet_auth::jwt::{JwtDecoder, JwtEncoder};
use fleet_auth::password::PasswordPolicy;
use fleet_cache::{CacheManager, CacheService};
use fleet_core::config::AppConfig;
use fleet_database::DatabaseManager;
use fleet_service::{AdministratorService, HealthCheckExecutor, StatisticsService, VehicleService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Every field is
/// cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Data store (PostgreSQL or in-memory)
    pub db: DatabaseManager,
    /// Cache manager (Redis or in-memory), also backing the rate limiter
    pub cache: Arc<CacheManager>,

    // ── Auth ─────────────────────────────────────────────────
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Rules applied to passwords of new administrators
    pub password_policy: PasswordPolicy,

    // ── Services ─────────────────────────────────────────────
    pub administrators: AdministratorService,
    pub vehicles: VehicleService,
    pub statistics: StatisticsService,
    pub health: HealthCheckExecutor,
}

impl AppState {
    /// Wire services on top of the given infrastructure.
    pub fn new(config: AppConfig, db: DatabaseManager, cache: Arc<CacheManager>) -> Self {
        let cache_service = CacheService::new(Arc::clone(&cache));
        let encoder = JwtEncoder::new(&config.auth);

        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            password_policy: PasswordPolicy::default(),
            administrators: AdministratorService::new(db.clone(), cache_service.clone(), encoder),
            vehicles: VehicleService::new(db.clone(), cache_service.clone()),
            statistics: StatisticsService::new(db.clone(), cache_service),
            health: HealthCheckExecutor::standard(db.clone(), Arc::clone(&cache), &config.health),
            config: Arc::new(config),
            db,
            cache,
        }
    }
}
