//! Back-office activity counters.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Counts shown on the dashboard, over a trailing window of days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DashboardStats {
    pub window_days: i32,
    pub invoices_last_30_days: i64,
    pub active_routes: i64,
    pub parcels_last_30_days: i64,
    pub open_registers: i64,
}
