//! Invoiceable customers identified by RUC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::{CustomerId, PersonId};

/// A customer that can be invoiced or ship parcels.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: CustomerId,
    /// The person behind the customer, if any.
    pub person_id: Option<PersonId>,
    /// Taxpayer registry number, unique.
    pub ruc: String,
    /// RUC check digit.
    pub dv: Option<String>,
    /// Name printed on invoices.
    pub business_name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub registered_at: DateTime<Utc>,
}

impl Customer {
    /// RUC with its check digit, as printed on invoices (`80001230-5`).
    pub fn ruc_with_dv(&self) -> String {
        match &self.dv {
            Some(dv) if !dv.is_empty() => format!("{}-{}", self.ruc, dv),
            _ => self.ruc.clone(),
        }
    }
}

/// Create or replace payload for a customer.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CustomerInput {
    pub person_id: Option<PersonId>,
    #[validate(length(min = 1, max = 20))]
    pub ruc: String,
    #[validate(length(max = 2))]
    pub dv: Option<String>,
    #[validate(length(min = 1, max = 150))]
    pub business_name: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dv_limited_to_two_chars() {
        let input = CustomerInput {
            person_id: None,
            ruc: "8000123".into(),
            dv: Some("123".into()),
            business_name: "NSA Transportes".into(),
            phone: None,
            address: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_ruc_with_dv() {
        let customer = Customer {
            id: CustomerId::new(1),
            person_id: None,
            ruc: "1234567".into(),
            dv: Some("7".into()),
            business_name: "Juan Pérez".into(),
            phone: None,
            address: None,
            registered_at: Utc::now(),
        };
        assert_eq!(customer.ruc_with_dv(), "1234567-7");
    }
}
