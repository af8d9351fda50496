//! Administrator entity model.

use chrono::{DateTime, Utc};
use fleet_core::traits::Entity;
use fleet_core::types::FilterValue;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::Role;

/// An account allowed to sign in to the management API.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Administrator {
    /// Store-generated identifier.
    pub id: i64,
    /// Unique login email, stored lower-cased.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Permission tier.
    pub role: Role,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to create an administrator.
#[derive(Debug, Clone)]
pub struct NewAdministrator {
    /// Login email.
    pub email: String,
    /// Argon2 password hash (never the plain password).
    pub password_hash: String,
    /// Permission tier.
    pub role: Role,
}

impl Entity for Administrator {
    type Draft = NewAdministrator;

    const NAME: &'static str = "administrator";
    const FILTERABLE: &'static [&'static str] = &["id", "email", "role"];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_draft(id: i64, draft: &NewAdministrator, now: DateTime<Utc>) -> Self {
        Self {
            id,
            email: draft.email.clone(),
            password_hash: draft.password_hash.clone(),
            role: draft.role,
            created_at: now,
        }
    }

    fn field(&self, name: &str) -> Option<FilterValue> {
        match name {
            "id" => Some(FilterValue::Integer(self.id)),
            "email" => Some(FilterValue::String(self.email.clone())),
            "role" => Some(FilterValue::String(self.role.as_str().to_string())),
            _ => None,
        }
    }

    fn unique_key(&self) -> Option<String> {
        Some(self.email.to_lowercase())
    }
}
