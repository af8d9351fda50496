//! Administrator role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission tiers an administrator can hold.
///
/// The wire and token value of [`Role::Admin`] is `"Adm"`; `"Admin"` is
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "administrator_role")]
pub enum Role {
    /// Full access, including administrator management.
    #[serde(rename = "Adm", alias = "Admin")]
    #[sqlx(rename = "Adm")]
    Admin,
    /// May register and read vehicles.
    #[serde(rename = "Editor")]
    #[sqlx(rename = "Editor")]
    Editor,
}

impl Role {
    /// Return the canonical role name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Adm",
            Self::Editor => "Editor",
        }
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = fleet_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adm" | "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            _ => Err(fleet_core::AppError::validation(format!(
                "Invalid role: '{s}'. Expected one of: Adm, Editor"
            ))),
        }
    }
}
