//! Role policies.
//!
//! A policy is a zero-sized marker naming which roles may call an endpoint.
//! The HTTP layer is generic over the marker so the check happens while the
//! request head is extracted.

use fleet_core::error::AppError;
use fleet_core::result::AppResult;
use fleet_entity::Role;

/// Decides whether a role may proceed.
pub trait RolePolicy: Send + Sync + 'static {
    /// Short description used in logs.
    const DESCRIPTION: &'static str;

    /// Whether `role` satisfies the policy.
    fn allows(role: Role) -> bool;

    /// Authorization error when `role` is not allowed.
    fn require(role: Role) -> AppResult<()> {
        if Self::allows(role) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{role}' does not satisfy '{}'",
                Self::DESCRIPTION
            )))
        }
    }
}

/// Administrators only.
#[derive(Debug, Clone, Copy)]
pub struct AdminOnly;

impl RolePolicy for AdminOnly {
    const DESCRIPTION: &'static str = "Adm";

    fn allows(role: Role) -> bool {
        role.is_admin()
    }
}

/// Administrators and editors.
#[derive(Debug, Clone, Copy)]
pub struct AdminOrEditor;

impl RolePolicy for AdminOrEditor {
    const DESCRIPTION: &'static str = "Adm,Editor";

    fn allows(role: Role) -> bool {
        matches!(role, Role::Admin | Role::Editor)
    }
}

/// Any authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct AnyRole;

impl RolePolicy for AnyRole {
    const DESCRIPTION: &'static str = "authenticated";

    fn allows(_role: Role) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use fleet_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_admin_only() {
        assert!(AdminOnly::require(Role::Admin).is_ok());
        let err = AdminOnly::require(Role::Editor).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[test]
    fn test_admin_or_editor() {
        assert!(AdminOrEditor::allows(Role::Admin));
        assert!(AdminOrEditor::allows(Role::Editor));
    }
}
