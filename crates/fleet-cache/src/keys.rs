//! Cache key builders for every cache entry the service writes.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

// ── Vehicle keys ───────────────────────────────────────────

/// Cache key for one page of the vehicle listing.
pub fn vehicles_page(page: u64) -> String {
    format!("veiculos:list:page:{page}")
}

/// Pattern matching every cached vehicle listing page.
pub fn vehicles_pages_pattern() -> &'static str {
    "veiculos:list:*"
}

/// Cache key for a vehicle by ID.
pub fn vehicle_by_id(id: i64) -> String {
    format!("veiculo:id:{id}")
}

// ── Administrator keys ─────────────────────────────────────

/// Cache key for one page of the administrator listing.
pub fn administrators_page(page: u64) -> String {
    format!("administradores:list:page:{page}")
}

/// Pattern matching every cached administrator listing page.
pub fn administrators_pages_pattern() -> &'static str {
    "administradores:list:*"
}

/// Cache key for an administrator by ID.
pub fn administrator_by_id(id: i64) -> String {
    format!("administrador:id:{id}")
}

// ── Statistics ─────────────────────────────────────────────

/// Cache key for the aggregate statistics document.
pub fn statistics() -> &'static str {
    "estatisticas:geral"
}

// ── Rate limiting ──────────────────────────────────────────

/// Cache key for a fixed-window request counter.
pub fn rate_limit(policy: &str, identity: &str) -> String {
    format!("ratelimit:{policy}:{identity}")
}
