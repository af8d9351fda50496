//! Claims carried by every access token.

use serde::{Deserialize, Serialize};

use fleet_entity::Role;

/// JWT payload.
///
/// `Email` and `Perfil` keep the names clients already read; `role` is the
/// conventional claim checked by authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Administrator id.
    pub sub: String,
    /// Login email.
    #[serde(rename = "Email")]
    pub email: String,
    /// Role as shown to clients.
    #[serde(rename = "Perfil")]
    pub perfil: Role,
    /// Role used for authorization.
    pub role: Role,
    /// Issuer.
    pub iss: String,
    /// Issued-at (seconds since epoch).
    pub iat: i64,
    /// Expiration (seconds since epoch).
    pub exp: i64,
}
