//! Fiscal stamps (timbrados) authorizing invoice issuance.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

use tr4cking_core::types::FiscalStampId;

/// A fiscal stamp with its validity window.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FiscalStamp {
    pub id: FiscalStampId,
    pub number: String,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    pub active: bool,
}

impl FiscalStamp {
    /// Whether invoices may be issued under this stamp on `date`.
    pub fn is_usable_on(&self, date: NaiveDate) -> bool {
        self.active && self.valid_from <= date && date <= self.valid_until
    }
}

/// Create or replace payload for a fiscal stamp.
#[derive(Debug, Clone, Deserialize, Validate)]
#[validate(schema(function = "validate_window"))]
pub struct FiscalStampInput {
    #[validate(length(min = 1, max = 20))]
    pub number: String,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn validate_window(input: &FiscalStampInput) -> Result<(), ValidationError> {
    if input.valid_from > input.valid_until {
        return Err(ValidationError::new("stamp_window")
            .with_message("valid_from must not be after valid_until".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_usable_window_is_inclusive() {
        let stamp = FiscalStamp {
            id: FiscalStampId::new(1),
            number: "12345678".into(),
            valid_from: date(2024, 1, 1),
            valid_until: date(2024, 12, 31),
            active: true,
        };
        assert!(stamp.is_usable_on(date(2024, 1, 1)));
        assert!(stamp.is_usable_on(date(2024, 12, 31)));
        assert!(!stamp.is_usable_on(date(2025, 1, 1)));

        let inactive = FiscalStamp { active: false, ..stamp };
        assert!(!inactive.is_usable_on(date(2024, 6, 1)));
    }

    #[test]
    fn test_reversed_window_rejected() {
        let input = FiscalStampInput {
            number: "12345678".into(),
            valid_from: date(2024, 12, 31),
            valid_until: date(2024, 1, 1),
            active: true,
        };
        assert!(input.validate().is_err());
    }
}
