//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use tr4cking_core::AppError;

/// Roles available in the RBAC system, replacing free-form groups.
///
/// Ordered by privilege: Admin > Manager > Clerk > Viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Full system administrator, including user management.
    Admin,
    /// Maintains the catalog (fleet, routes, stops) and voids invoices.
    Manager,
    /// Counter clerk: sells tickets, ships parcels, invoices, runs a register.
    Clerk,
    /// Read-only access.
    Viewer,
}

impl UserRole {
    /// Every role, most privileged first.
    pub const ALL: [UserRole; 4] = [Self::Admin, Self::Manager, Self::Clerk, Self::Viewer];

    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 4,
            Self::Manager => 3,
            Self::Clerk => 2,
            Self::Viewer => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Clerk => "clerk",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "clerk" => Ok(Self::Clerk),
            "viewer" => Ok(Self::Viewer),
            _ => Err(AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: admin, manager, clerk, viewer"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privilege_ordering() {
        assert!(UserRole::Admin.has_at_least(&UserRole::Viewer));
        assert!(UserRole::Manager.has_at_least(&UserRole::Clerk));
        assert!(UserRole::Clerk.has_at_least(&UserRole::Clerk));
        assert!(!UserRole::Viewer.has_at_least(&UserRole::Clerk));
    }

    #[test]
    fn test_from_str() {
        assert_eq!("CLERK".parse::<UserRole>().unwrap(), UserRole::Clerk);
        assert!("creator".parse::<UserRole>().is_err());
    }
}
