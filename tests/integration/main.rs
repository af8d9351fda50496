//! End-to-end tests driving the full router against the in-memory store.

mod helpers;

mod administrator_test;
mod auth_test;
mod health_test;
mod middleware_test;
mod rate_limit_test;
mod vehicle_test;
