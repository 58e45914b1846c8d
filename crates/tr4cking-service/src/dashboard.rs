//! Dashboard counters.

use std::sync::Arc;

use tr4cking_auth::rbac::{RbacEnforcer, SystemPermission};
use tr4cking_core::result::AppResult;
use tr4cking_database::repositories::DashboardRepository;
use tr4cking_entity::register::DashboardStats;

use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct DashboardService {
    repo: Arc<DashboardRepository>,
    rbac: Arc<RbacEnforcer>,
    window_days: i32,
}

impl DashboardService {
    pub fn new(repo: Arc<DashboardRepository>, rbac: Arc<RbacEnforcer>, window_days: u32) -> Self {
        Self {
            repo,
            rbac,
            window_days: i32::try_from(window_days).unwrap_or(i32::MAX),
        }
    }

    pub async fn stats(&self, ctx: &RequestContext) -> AppResult<DashboardStats> {
        self.rbac
            .require_permission(&ctx.role, &SystemPermission::DashboardView)?;
        self.repo.stats(self.window_days).await
    }
}
