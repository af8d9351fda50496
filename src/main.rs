//! Fleet Server: vehicle and administrator management API.
//!
//! Main entry point that wires all crates together and starts the server.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use fleet_api::{AppState, build_router};
use fleet_cache::CacheManager;
use fleet_core::config::AppConfig;
use fleet_database::DatabaseManager;
use fleet_worker::TaskRunner;

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "fleet-server", version, about = "Vehicle fleet management API")]
struct Cli {
    /// Configuration overlay loaded on top of `config/default.toml`.
    #[arg(long, env = "FLEET_ENV", default_value = "development")]
    env: String,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match AppConfig::load(&cli.env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config, &cli.env).await {
        tracing::error!("Server error: {e:#}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig, env: &str) -> anyhow::Result<()> {
    tracing::info!(env, "Starting fleet-server v{}", env!("CARGO_PKG_VERSION"));

    if config.auth.uses_default_secret() {
        tracing::warn!("auth.jwt_secret is the built-in development key; set FLEET__AUTH__JWT_SECRET");
    }

    // ── Step 1: Data store (migrations run inside connect) ───────
    tracing::info!(provider = %config.database.provider, "Connecting to data store...");
    let db = DatabaseManager::connect(&config.database)
        .await
        .context("data store initialization failed")?;

    // ── Step 2: Cache ────────────────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing cache...");
    let cache = Arc::new(
        CacheManager::new(&config.cache)
            .await
            .context("cache initialization failed")?,
    );

    // ── Step 3: Application state and seed data ──────────────────
    let state = AppState::new(config.clone(), db.clone(), Arc::clone(&cache));

    if let Some(seed) = &config.auth.seed_admin {
        let created = state
            .administrators
            .seed(seed)
            .await
            .context("seeding administrator failed")?;
        if created {
            tracing::info!(email = %seed.email, "Seed administrator created");
        }
    }

    // ── Step 4: Background tasks ─────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let worker_handle = if config.worker.enabled {
        let handle = TaskRunner::standard(
            &config.worker,
            state.statistics.clone(),
            db.clone(),
            state.health.clone(),
        )
        .start(shutdown_rx)
        .await
        .context("background task scheduler failed to start")?;
        Some(handle)
    } else {
        tracing::info!("Background tasks disabled");
        None
    };

    // ── Step 5: HTTP server ──────────────────────────────────────
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("fleet-server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
        let _ = shutdown_tx.send(true);
    })
    .await
    .context("HTTP server failed")?;

    // ── Step 6: Wait for background tasks ────────────────────────
    tracing::info!("Waiting for background tasks to complete...");
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    if let Some(handle) = worker_handle {
        if tokio::time::timeout(grace, handle).await.is_err() {
            tracing::warn!("Background tasks did not stop within the grace period");
        }
    }

    db.close().await;
    tracing::info!("fleet-server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
