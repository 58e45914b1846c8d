//! Dashboard counters.

use sqlx::PgPool;

use tr4cking_core::result::AppResult;
use tr4cking_entity::register::DashboardStats;

use crate::error::map_read_error;

#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Activity counters over the trailing `window_days`.
    pub async fn stats(&self, window_days: i32) -> AppResult<DashboardStats> {
        sqlx::query_as::<_, DashboardStats>(
            "SELECT $1::INTEGER AS window_days, \
                    (SELECT COUNT(*) FROM invoices \
                      WHERE status = 'issued' \
                        AND issued_at >= NOW() - make_interval(days => $1)) \
                        AS invoices_last_30_days, \
                    (SELECT COUNT(*) FROM routes WHERE active) AS active_routes, \
                    (SELECT COUNT(*) FROM parcels \
                      WHERE created_at >= NOW() - make_interval(days => $1)) \
                        AS parcels_last_30_days, \
                    (SELECT COUNT(*) FROM cash_registers WHERE status = 'open') \
                        AS open_registers",
        )
        .bind(window_days)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_read_error(e, "Failed to load dashboard counters"))
    }
}
