//! Role-to-permission mapping definitions.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use tr4cking_entity::user::UserRole;

/// A back-office permission granted through a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPermission {
    /// Read any catalog, sales or register data.
    CatalogRead,
    /// Maintain companies, fleet, geography, routes, trips and people.
    CatalogWrite,
    /// Sell, move and cancel tickets and manage reservations.
    TicketSell,
    /// Register and edit parcel shipments.
    ParcelManage,
    /// Issue invoices and change their payment condition.
    InvoiceIssue,
    /// Void issued invoices.
    InvoiceVoid,
    /// Open and close registers and book manual movements.
    RegisterOperate,
    /// Manage back-office users.
    UserManage,
    /// See the dashboard counters.
    DashboardView,
}

impl SystemPermission {
    /// Every permission, in declaration order.
    pub const ALL: [SystemPermission; 9] = [
        Self::CatalogRead,
        Self::CatalogWrite,
        Self::TicketSell,
        Self::ParcelManage,
        Self::InvoiceIssue,
        Self::InvoiceVoid,
        Self::RegisterOperate,
        Self::UserManage,
        Self::DashboardView,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CatalogRead => "catalog_read",
            Self::CatalogWrite => "catalog_write",
            Self::TicketSell => "ticket_sell",
            Self::ParcelManage => "parcel_manage",
            Self::InvoiceIssue => "invoice_issue",
            Self::InvoiceVoid => "invoice_void",
            Self::RegisterOperate => "register_operate",
            Self::UserManage => "user_manage",
            Self::DashboardView => "dashboard_view",
        }
    }
}

impl fmt::Display for SystemPermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps each role to its set of allowed permissions.
#[derive(Debug, Clone)]
pub struct RbacPolicies {
    policies: HashMap<UserRole, HashSet<SystemPermission>>,
}

impl RbacPolicies {
    /// Creates the default policy set.
    pub fn new() -> Self {
        let viewer: HashSet<SystemPermission> =
            [SystemPermission::CatalogRead, SystemPermission::DashboardView]
                .into_iter()
                .collect();

        let mut clerk = viewer.clone();
        clerk.extend([
            SystemPermission::TicketSell,
            SystemPermission::ParcelManage,
            SystemPermission::InvoiceIssue,
            SystemPermission::RegisterOperate,
        ]);

        let mut manager = clerk.clone();
        manager.extend([SystemPermission::CatalogWrite, SystemPermission::InvoiceVoid]);

        let admin: HashSet<SystemPermission> = SystemPermission::ALL.into_iter().collect();

        let policies = HashMap::from([
            (UserRole::Viewer, viewer),
            (UserRole::Clerk, clerk),
            (UserRole::Manager, manager),
            (UserRole::Admin, admin),
        ]);

        Self { policies }
    }

    /// Returns the permissions for the given role, sorted.
    pub fn permissions_for_role(&self, role: &UserRole) -> Vec<SystemPermission> {
        let mut permissions: Vec<_> = self
            .policies
            .get(role)
            .map(|perms| perms.iter().copied().collect())
            .unwrap_or_default();
        permissions.sort();
        permissions
    }

    /// Checks whether the given role has the specified permission.
    pub fn has_permission(&self, role: &UserRole, permission: &SystemPermission) -> bool {
        self.policies
            .get(role)
            .is_some_and(|perms| perms.contains(permission))
    }
}

impl Default for RbacPolicies {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewer_only_reads() {
        let policies = RbacPolicies::new();
        assert!(policies.has_permission(&UserRole::Viewer, &SystemPermission::CatalogRead));
        assert!(!policies.has_permission(&UserRole::Viewer, &SystemPermission::TicketSell));
        assert!(!policies.has_permission(&UserRole::Viewer, &SystemPermission::CatalogWrite));
    }

    #[test]
    fn test_clerk_sells_but_cannot_void() {
        let policies = RbacPolicies::new();
        assert!(policies.has_permission(&UserRole::Clerk, &SystemPermission::TicketSell));
        assert!(policies.has_permission(&UserRole::Clerk, &SystemPermission::RegisterOperate));
        assert!(!policies.has_permission(&UserRole::Clerk, &SystemPermission::InvoiceVoid));
        assert!(!policies.has_permission(&UserRole::Clerk, &SystemPermission::CatalogWrite));
    }

    #[test]
    fn test_manager_and_admin() {
        let policies = RbacPolicies::new();
        assert!(policies.has_permission(&UserRole::Manager, &SystemPermission::InvoiceVoid));
        assert!(!policies.has_permission(&UserRole::Manager, &SystemPermission::UserManage));
        assert_eq!(
            policies.permissions_for_role(&UserRole::Admin),
            SystemPermission::ALL.to_vec()
        );
    }

    #[test]
    fn test_roles_are_cumulative() {
        let policies = RbacPolicies::new();
        for pair in UserRole::ALL.windows(2) {
            let (higher, lower) = (pair[0], pair[1]);
            for permission in policies.permissions_for_role(&lower) {
                assert!(policies.has_permission(&higher, &permission));
            }
        }
    }
}
