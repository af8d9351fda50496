//! # fleet-auth
//!
//! Credential handling for the fleet service.
//!
//! - `jwt`: claims, token issuance and validation (HS256)
//! - `password`: Argon2id hashing and the administrator password policy
//! - `rbac`: role policies used by the HTTP extractors

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordPolicy};
pub use rbac::{AdminOnly, AdminOrEditor, AnyRole, RolePolicy};
