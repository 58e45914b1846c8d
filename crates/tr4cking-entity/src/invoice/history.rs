//! Audit trail of invoice changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use tr4cking_core::types::{EmployeeId, InvoiceHistoryId, InvoiceId};

/// One recorded change to an invoice field.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceHistory {
    pub id: InvoiceHistoryId,
    pub invoice_id: InvoiceId,
    pub changed_at: DateTime<Utc>,
    /// Changed field (`status`, `condition`).
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub employee_id: Option<EmployeeId>,
}
