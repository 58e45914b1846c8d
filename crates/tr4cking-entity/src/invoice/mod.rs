//! Fiscal documents: document types, stamps, invoices, lines and audit history.

pub mod document_type;
pub mod history;
pub mod line;
pub mod model;
pub mod number;
pub mod stamp;

pub use document_type::{DocumentType, DocumentTypeInput};
pub use history::InvoiceHistory;
pub use line::{InvoiceLine, InvoiceLineInput, InvoiceTotals, VAT_RATES};
pub use model::{
    ConditionChange, Invoice, InvoiceDetail, InvoiceInput, InvoiceStatus, PaymentCondition,
};
pub use number::{is_valid_invoice_number, next_invoice_number};
pub use stamp::{FiscalStamp, FiscalStampInput};
