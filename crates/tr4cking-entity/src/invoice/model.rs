//! Invoice header model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use tr4cking_core::AppError;
use tr4cking_core::types::{
    CashRegisterId, CustomerId, DocumentTypeId, EmployeeId, FiscalStampId, Guaranies, InvoiceId,
    StopId,
};

use super::line::{InvoiceLine, InvoiceLineInput};
use super::number::is_valid_invoice_number;

/// Payment condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_condition", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentCondition {
    Cash,
    Credit,
}

impl PaymentCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Credit => "credit",
        }
    }
}

impl fmt::Display for PaymentCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentCondition {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "credit" => Ok(Self::Credit),
            _ => Err(AppError::validation(format!(
                "Invalid payment condition: '{s}'"
            ))),
        }
    }
}

/// Invoice status. Issued invoices can only move to voided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "invoice_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Issued,
    Voided,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Issued => "issued",
            Self::Voided => "voided",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issued" => Ok(Self::Issued),
            "voided" => Ok(Self::Voided),
            _ => Err(AppError::validation(format!("Invalid invoice status: '{s}'"))),
        }
    }
}

/// Invoice header.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub id: InvoiceId,
    /// `NNN-NNN-NNNNNNN`, unique.
    pub number: String,
    pub customer_id: Option<CustomerId>,
    pub employee_id: EmployeeId,
    pub document_type_id: DocumentTypeId,
    pub stamp_id: FiscalStampId,
    pub stop_id: Option<StopId>,
    pub cash_register_id: CashRegisterId,
    pub condition: PaymentCondition,
    pub status: InvoiceStatus,
    pub issued_at: DateTime<Utc>,
    pub total_amount: Guaranies,
    pub exempt_amount: Guaranies,
    pub vat5_amount: Guaranies,
    pub vat10_amount: Guaranies,
}

/// An invoice with its lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDetail {
    #[serde(flatten)]
    pub invoice: Invoice,
    pub lines: Vec<InvoiceLine>,
}

/// Payload for issuing an invoice.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InvoiceInput {
    /// Explicit number; the next number of the latest series is used when omitted.
    #[validate(custom(function = "validate_number"))]
    pub number: Option<String>,
    pub customer_id: Option<CustomerId>,
    /// Issuing employee; defaults to the caller's employee record.
    pub employee_id: Option<EmployeeId>,
    pub document_type_id: DocumentTypeId,
    pub stamp_id: FiscalStampId,
    pub stop_id: Option<StopId>,
    /// Register to book the sale on; defaults to the earliest opened one.
    pub cash_register_id: Option<CashRegisterId>,
    #[serde(default = "default_condition")]
    pub condition: PaymentCondition,
    #[validate(length(min = 1, message = "An invoice needs at least one line"), nested)]
    pub lines: Vec<InvoiceLineInput>,
}

fn default_condition() -> PaymentCondition {
    PaymentCondition::Cash
}

fn validate_number(number: &str) -> Result<(), ValidationError> {
    if is_valid_invoice_number(number) {
        Ok(())
    } else {
        Err(ValidationError::new("invoice_number")
            .with_message("Invoice number must look like 001-001-0000001".into()))
    }
}

/// Payload for changing an invoice's payment condition.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConditionChange {
    pub condition: PaymentCondition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_requires_lines() {
        let input: InvoiceInput = serde_json::from_str(
            r#"{"document_type_id": 1, "stamp_id": 1, "lines": []}"#,
        )
        .unwrap();
        assert_eq!(input.condition, PaymentCondition::Cash);
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_input_checks_number_and_nested_lines() {
        let input: InvoiceInput = serde_json::from_str(
            r#"{
                "number": "001-001-0000010",
                "document_type_id": 1,
                "stamp_id": 1,
                "lines": [{"description": "Encomienda", "quantity": 1, "unit_price": 15000}]
            }"#,
        )
        .unwrap();
        assert!(input.validate().is_ok());
        assert_eq!(input.lines[0].vat_rate, 10);

        let bad_number = InvoiceInput {
            number: Some("10".into()),
            ..input.clone()
        };
        assert!(bad_number.validate().is_err());

        let mut bad_line = input;
        bad_line.lines[0].quantity = 0;
        assert!(bad_line.validate().is_err());
    }
}
