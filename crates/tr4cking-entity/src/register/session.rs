//! Register sessions: the span between opening and closing a register.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::{CashRegisterId, EmployeeId, Guaranies, RegisterSessionId};

/// One open/close cycle of a register.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegisterSession {
    pub id: RegisterSessionId,
    pub cash_register_id: CashRegisterId,
    pub opened_by: EmployeeId,
    pub opened_at: DateTime<Utc>,
    pub opening_amount: Guaranies,
    pub closed_by: Option<EmployeeId>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Cash counted at close.
    pub closing_amount: Option<Guaranies>,
    /// Opening amount plus income minus expenses, computed at close.
    pub expected_amount: Option<Guaranies>,
}

impl RegisterSession {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Counted minus expected, once closed.
    pub fn difference(&self) -> Option<Guaranies> {
        Some(self.closing_amount? - self.expected_amount?)
    }
}

/// Cash the register should hold at close.
pub fn expected_balance(opening: Guaranies, income: Guaranies, expense: Guaranies) -> Guaranies {
    opening + income - expense
}

/// Payload for opening a register.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OpenSession {
    /// Defaults to the caller's employee record.
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub opening_amount: Guaranies,
}

/// Payload for closing a register.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CloseRegister {
    /// Defaults to the caller's employee record.
    pub employee_id: Option<EmployeeId>,
    #[validate(range(min = 0))]
    pub closing_amount: Guaranies,
}

/// Result of closing a register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClosing {
    pub session: RegisterSession,
    pub income: Guaranies,
    pub expense: Guaranies,
    pub expected_amount: Guaranies,
    pub closing_amount: Guaranies,
    /// Positive when there is more cash than expected.
    pub difference: Guaranies,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_balance() {
        assert_eq!(expected_balance(100_000, 250_000, 50_000), 300_000);
        assert_eq!(expected_balance(0, 0, 0), 0);
    }

    #[test]
    fn test_difference_only_when_closed() {
        let mut session = RegisterSession {
            id: RegisterSessionId::new(1),
            cash_register_id: CashRegisterId::new(1),
            opened_by: EmployeeId::new(1),
            opened_at: Utc::now(),
            opening_amount: 100_000,
            closed_by: None,
            closed_at: None,
            closing_amount: None,
            expected_amount: None,
        };
        assert!(session.is_open());
        assert_eq!(session.difference(), None);

        session.closed_at = Some(Utc::now());
        session.closing_amount = Some(295_000);
        session.expected_amount = Some(300_000);
        assert!(!session.is_open());
        assert_eq!(session.difference(), Some(-5_000));
    }

    #[test]
    fn test_negative_opening_rejected() {
        let input: OpenSession = serde_json::from_str(r#"{"opening_amount": -1}"#).unwrap();
        assert!(input.validate().is_err());
    }
}
