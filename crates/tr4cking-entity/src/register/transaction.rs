//! Cash movements booked in a register session.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use tr4cking_core::AppError;
use tr4cking_core::types::{Guaranies, InvoiceId, RegisterSessionId, RegisterTransactionId};

/// Direction of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(AppError::validation(format!(
                "Invalid transaction kind: '{s}'"
            ))),
        }
    }
}

/// A cash movement.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegisterTransaction {
    pub id: RegisterTransactionId,
    pub session_id: RegisterSessionId,
    pub kind: TransactionKind,
    /// Always positive; `kind` gives the sign.
    pub amount: Guaranies,
    pub description: Option<String>,
    /// Invoice that caused the movement.
    pub invoice_id: Option<InvoiceId>,
    pub occurred_at: DateTime<Utc>,
}

/// Payload for a manual cash movement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TransactionInput {
    pub kind: TransactionKind,
    #[validate(range(min = 1))]
    pub amount: Guaranies,
    #[validate(length(max = 255))]
    pub description: Option<String>,
}
