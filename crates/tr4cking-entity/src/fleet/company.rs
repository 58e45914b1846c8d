//! Transport companies.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::CompanyId;

/// A transport company operating buses.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub ruc: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub legal_address: Option<String>,
}

/// Create or replace payload for a company.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompanyInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub ruc: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub legal_address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_must_be_valid() {
        let input = CompanyInput {
            name: "NSA Transportes".into(),
            ruc: "8000123-0".into(),
            phone: None,
            email: Some("not-an-email".into()),
            legal_address: None,
        };
        assert!(input.validate().is_err());
        let fixed = CompanyInput {
            email: Some("ventas@nsa.com.py".into()),
            ..input
        };
        assert!(fixed.validate().is_ok());
    }
}
