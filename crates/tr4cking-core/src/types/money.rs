//! Money helpers.
//!
//! Amounts are whole guaraníes (PYG has no minor unit) stored as `BIGINT`.

/// Amount in guaraníes.
pub type Guaranies = i64;

/// Divide rounding half away from zero.
pub fn div_round(numerator: Guaranies, denominator: Guaranies) -> Guaranies {
    if denominator == 0 {
        return 0;
    }
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if remainder.abs() * 2 >= denominator.abs() {
        quotient + numerator.signum() * denominator.signum()
    } else {
        quotient
    }
}

/// VAT contained in a VAT-inclusive amount at the given rate (percent).
///
/// Paraguayan prices include VAT, so the tax is `amount * rate / (100 + rate)`:
/// one eleventh at 10 % and one twenty-first at 5 %. `None` when the
/// intermediate product does not fit in an `i64`.
pub fn included_vat(amount: Guaranies, rate_percent: i64) -> Option<Guaranies> {
    if rate_percent <= 0 {
        return Some(0);
    }
    amount
        .checked_mul(rate_percent)
        .map(|scaled| div_round(scaled, 100 + rate_percent))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_div_round() {
        assert_eq!(div_round(10, 4), 3);
        assert_eq!(div_round(9, 4), 2);
        assert_eq!(div_round(-10, 4), -3);
        assert_eq!(div_round(5, 0), 0);
    }

    #[test]
    fn test_included_vat() {
        assert_eq!(included_vat(110_000, 10), Some(10_000));
        assert_eq!(included_vat(105_000, 5), Some(5_000));
        assert_eq!(included_vat(50_000, 0), Some(0));
        // 25_000 / 11 = 2272.7
        assert_eq!(included_vat(25_000, 10), Some(2_273));
    }

    #[test]
    fn test_included_vat_overflow() {
        assert_eq!(included_vat(i64::MAX / 2, 10), None);
        assert_eq!(included_vat(i64::MAX, 0), Some(0));
    }
}
