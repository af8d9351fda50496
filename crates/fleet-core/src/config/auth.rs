//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime in hours.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_hours: u64,
    /// Value written to the `iss` claim and required on decode.
    #[serde(default = "default_issuer")]
    pub issuer: String,
    /// Administrator created at startup when none exist.
    #[serde(default)]
    pub seed_admin: Option<SeedAdministratorConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl(),
            issuer: default_issuer(),
            seed_admin: None,
        }
    }
}

/// Bootstrap administrator credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedAdministratorConfig {
    /// Login email.
    pub email: String,
    /// Plain-text password, hashed before it is stored.
    pub password: String,
    /// Role name (`Adm` or `Editor`).
    #[serde(default = "default_seed_role")]
    pub role: String,
}

pub(crate) fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_token_ttl() -> u64 {
    24
}

fn default_issuer() -> String {
    "fleet".to_string()
}

fn default_seed_role() -> String {
    "Adm".to_string()
}

impl AuthConfig {
    /// Whether the signing key is still the shipped placeholder.
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == default_jwt_secret()
    }
}
