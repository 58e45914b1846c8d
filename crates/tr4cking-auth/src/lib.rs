//! # tr4cking-auth
//!
//! Credentials and authorization for the Tr4cking back office.
//!
//! ## Modules
//!
//! - `jwt`: access token creation and validation
//! - `password`: Argon2id password hashing and policy enforcement
//! - `rbac`: fixed role → permission policy and its enforcement

pub mod jwt;
pub mod password;
pub mod rbac;

pub use jwt::{Claims, IssuedToken, JwtDecoder, JwtEncoder};
pub use password::{PasswordHasher, PasswordValidator};
pub use rbac::{RbacEnforcer, RbacPolicies, SystemPermission};
