//! Natural persons identified by their national document.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::PersonId;

/// A natural person.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Person {
    /// Unique person identifier.
    pub id: PersonId,
    /// National identity document (cédula), unique.
    pub document_number: String,
    /// Given names.
    pub first_name: String,
    /// Family names.
    pub last_name: String,
    /// Contact phone.
    pub phone: Option<String>,
    /// Postal address.
    pub address: Option<String>,
}

impl Person {
    /// `first_name last_name`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Create or replace payload for a person.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PersonInput {
    #[validate(length(min = 1, max = 20))]
    pub document_number: String,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_validation() {
        let ok = PersonInput {
            document_number: "1234567".into(),
            first_name: "Juan".into(),
            last_name: "Pérez".into(),
            phone: None,
            address: None,
        };
        assert!(ok.validate().is_ok());

        let blank = PersonInput {
            document_number: String::new(),
            ..ok
        };
        assert!(blank.validate().is_err());
    }
}
