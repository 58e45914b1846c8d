//! Kinds of fiscal documents (invoice, credit note, receipt).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use tr4cking_core::types::DocumentTypeId;

/// A fiscal document type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DocumentType {
    pub id: DocumentTypeId,
    /// Short code, unique (`FAC`, `NC`).
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    /// Documents of this type must name a registered customer.
    pub requires_registered_customer: bool,
}

/// Create or replace payload for a document type.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DocumentTypeInput {
    #[validate(length(min = 1, max = 10))]
    pub code: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub requires_registered_customer: bool,
}
