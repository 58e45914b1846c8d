//! Invoice lines and VAT-inclusive totals.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use tr4cking_core::AppError;
use tr4cking_core::result::AppResult;
use tr4cking_core::types::money::included_vat;
use tr4cking_core::types::{Guaranies, InvoiceId, InvoiceLineId, ParcelId, TicketId};

/// VAT rates allowed on a line, in percent.
pub const VAT_RATES: [i16; 3] = [0, 5, 10];

/// A stored invoice line.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceLine {
    pub id: InvoiceLineId,
    pub invoice_id: InvoiceId,
    pub ticket_id: Option<TicketId>,
    pub parcel_id: Option<ParcelId>,
    pub description: String,
    pub quantity: i32,
    pub unit_price: Guaranies,
    /// 0, 5 or 10.
    pub vat_rate: i16,
    /// `quantity * unit_price`, VAT included.
    pub subtotal: Guaranies,
}

/// A line as submitted when issuing an invoice.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_single_item"))]
pub struct InvoiceLineInput {
    pub ticket_id: Option<TicketId>,
    pub parcel_id: Option<ParcelId>,
    #[validate(length(min = 1, max = 255))]
    pub description: String,
    #[validate(range(min = 1, max = 10_000))]
    pub quantity: i32,
    #[validate(range(min = 0, max = 1_000_000_000_000i64))]
    pub unit_price: Guaranies,
    #[serde(default = "default_vat_rate")]
    #[validate(custom(function = "validate_vat_rate"))]
    pub vat_rate: i16,
}

impl InvoiceLineInput {
    /// `quantity * unit_price`.
    pub fn subtotal(&self) -> AppResult<Guaranies> {
        i64::from(self.quantity)
            .checked_mul(self.unit_price)
            .ok_or_else(out_of_range)
    }
}

fn out_of_range() -> AppError {
    AppError::validation("Invoice amount out of range")
}

fn default_vat_rate() -> i16 {
    10
}

fn validate_vat_rate(rate: i16) -> Result<(), ValidationError> {
    if VAT_RATES.contains(&rate) {
        Ok(())
    } else {
        Err(ValidationError::new("vat_rate").with_message("VAT rate must be 0, 5 or 10".into()))
    }
}

fn validate_single_item(line: &InvoiceLineInput) -> Result<(), ValidationError> {
    if line.ticket_id.is_some() && line.parcel_id.is_some() {
        return Err(ValidationError::new("single_item")
            .with_message("A line may reference a ticket or a parcel, not both".into()));
    }
    Ok(())
}

/// Header amounts derived from the lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    pub total_amount: Guaranies,
    pub exempt_amount: Guaranies,
    pub vat5_amount: Guaranies,
    pub vat10_amount: Guaranies,
}

impl InvoiceTotals {
    /// Sum the lines. Prices include VAT, so the tax is extracted per rate
    /// from the rate's gross subtotal.
    ///
    /// Fails with a validation error when any amount overflows.
    pub fn from_lines(lines: &[InvoiceLineInput]) -> AppResult<Self> {
        let mut gross_5: Guaranies = 0;
        let mut gross_10: Guaranies = 0;
        let mut totals = Self::default();
        for line in lines {
            let subtotal = line.subtotal()?;
            totals.total_amount = add(totals.total_amount, subtotal)?;
            match line.vat_rate {
                5 => gross_5 = add(gross_5, subtotal)?,
                10 => gross_10 = add(gross_10, subtotal)?,
                _ => totals.exempt_amount = add(totals.exempt_amount, subtotal)?,
            }
        }
        totals.vat5_amount = included_vat(gross_5, 5).ok_or_else(out_of_range)?;
        totals.vat10_amount = included_vat(gross_10, 10).ok_or_else(out_of_range)?;
        Ok(totals)
    }
}

fn add(sum: Guaranies, amount: Guaranies) -> AppResult<Guaranies> {
    sum.checked_add(amount).ok_or_else(out_of_range)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(quantity: i32, unit_price: i64, vat_rate: i16) -> InvoiceLineInput {
        InvoiceLineInput {
            ticket_id: None,
            parcel_id: None,
            description: "Pasaje Asunción - Encarnación".into(),
            quantity,
            unit_price,
            vat_rate,
        }
    }

    #[test]
    fn test_totals_by_rate() {
        let totals = InvoiceTotals::from_lines(&[
            line(2, 55_000, 10),
            line(1, 21_000, 5),
            line(1, 5_000, 0),
        ])
        .unwrap();
        assert_eq!(totals.total_amount, 136_000);
        assert_eq!(totals.vat10_amount, 10_000);
        assert_eq!(totals.vat5_amount, 1_000);
        assert_eq!(totals.exempt_amount, 5_000);
    }

    #[test]
    fn test_vat_rounds() {
        let totals = InvoiceTotals::from_lines(&[line(1, 25_000, 10)]).unwrap();
        assert_eq!(totals.vat10_amount, 2_273);
        assert_eq!(totals.exempt_amount, 0);
    }

    #[test]
    fn test_line_validation() {
        assert!(line(1, 1_000, 10).validate().is_ok());
        assert!(line(0, 1_000, 10).validate().is_err());
        assert!(line(1, 1_000, 7).validate().is_err());
        assert!(line(10_001, 1_000, 10).validate().is_err());
        assert!(line(1, 1_000_000_000_001, 10).validate().is_err());

        let both = InvoiceLineInput {
            ticket_id: Some(TicketId::new(1)),
            parcel_id: Some(ParcelId::new(1)),
            ..line(1, 1_000, 10)
        };
        assert!(both.validate().is_err());
    }

    #[test]
    fn test_overflowing_amounts_are_rejected() {
        let huge = line(3, 4_611_686_018_427_387_904, 10);
        assert!(huge.subtotal().is_err());
        assert_eq!(
            InvoiceTotals::from_lines(&[huge]).unwrap_err().kind,
            tr4cking_core::error::ErrorKind::Validation
        );

        let half = line(1, i64::MAX / 2 + 1, 0);
        assert!(InvoiceTotals::from_lines(&[half.clone(), half]).is_err());

        // Fits as a gross amount, but not once scaled by the VAT rate.
        assert!(InvoiceTotals::from_lines(&[line(1, i64::MAX / 5, 10)]).is_err());
    }
}
