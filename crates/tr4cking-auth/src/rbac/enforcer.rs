//! RBAC enforcement: checks whether a role has a required permission.

use tr4cking_core::error::AppError;
use tr4cking_entity::user::UserRole;

use super::policies::{RbacPolicies, SystemPermission};

/// Enforces role-based access control for back-office operations.
#[derive(Debug, Clone, Default)]
pub struct RbacEnforcer {
    policies: RbacPolicies,
}

impl RbacEnforcer {
    pub fn new() -> Self {
        Self {
            policies: RbacPolicies::new(),
        }
    }

    pub fn with_policies(policies: RbacPolicies) -> Self {
        Self { policies }
    }

    /// Returns `Err(Forbidden)` unless `role` holds `permission`.
    pub fn require_permission(
        &self,
        role: &UserRole,
        permission: &SystemPermission,
    ) -> Result<(), AppError> {
        if self.policies.has_permission(role, permission) {
            Ok(())
        } else {
            Err(AppError::forbidden(format!(
                "Role '{role}' does not have permission '{permission}'"
            )))
        }
    }

    pub fn has_permission(&self, role: &UserRole, permission: &SystemPermission) -> bool {
        self.policies.has_permission(role, permission)
    }

    pub fn policies(&self) -> &RbacPolicies {
        &self.policies
    }
}

#[cfg(test)]
mod tests {
    use tr4cking_core::error::ErrorKind;

    use super::*;

    #[test]
    fn test_denied_is_forbidden() {
        let err = RbacEnforcer::new()
            .require_permission(&UserRole::Viewer, &SystemPermission::InvoiceIssue)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);
        assert!(err.message.contains("invoice_issue"));
    }

    #[test]
    fn test_allowed_is_ok() {
        assert!(
            RbacEnforcer::new()
                .require_permission(&UserRole::Clerk, &SystemPermission::InvoiceIssue)
                .is_ok()
        );
    }
}
