//! Route definitions for the fleet HTTP API.
//!
//! The router receives `AppState` and passes it to all handlers via Axum's
//! `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .merge(home_routes())
        .merge(login_routes(&state))
        .merge(administrator_routes())
        .merge(vehicle_routes())
        .merge(health_routes())
        .fallback(handlers::not_found);

    with_middleware(routes, state)
}

/// Wrap `routes` in the request middleware stack and bind the state.
///
/// Layers, outermost first: request logging, CORS, problem `instance`
/// stamping, panic recovery, request timeout, general rate limit.
pub fn with_middleware(mut routes: Router<AppState>, state: AppState) -> Router {
    if state.config.rate_limit.enabled {
        routes = routes.layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::general_rate_limit,
        ));
    }

    routes
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::timeout::request_timeout,
        ))
        .layer(CatchPanicLayer::custom(middleware::panic::handle_panic))
        .layer(axum_middleware::from_fn(
            middleware::problem::problem_instance,
        ))
        .layer(middleware::cors::build_cors_layer(&state.config.server.cors))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Welcome document and statistics
fn home_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::home::home))
        .route("/api/estatisticas", get(handlers::statistics::statistics))
}

/// Login, behind the stricter auth rate-limit policy
fn login_routes(state: &AppState) -> Router<AppState> {
    let router = Router::new().route(
        "/administradores/login",
        post(handlers::administrators::login),
    );
    if state.config.rate_limit.enabled {
        router.route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::auth_rate_limit,
        ))
    } else {
        router
    }
}

/// Administrator management (admin only)
fn administrator_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/administradores",
            get(handlers::administrators::list).post(handlers::administrators::create),
        )
        .route("/administradores/{id}", get(handlers::administrators::get))
}

/// Vehicle CRUD
fn vehicle_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/veiculos",
            get(handlers::vehicles::list).post(handlers::vehicles::create),
        )
        .route(
            "/veiculos/{id}",
            get(handlers::vehicles::get)
                .put(handlers::vehicles::update)
                .delete(handlers::vehicles::delete),
        )
}

/// Liveness/readiness probes
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(handlers::health::api_health))
        .route("/health", get(handlers::health::health))
        .route("/health/ready", get(handlers::health::ready))
        .route("/health/live", get(handlers::health::live))
}
