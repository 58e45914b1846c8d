//! Invoice numbering: establishment, emission point and sequence
//! (`001-001-0000001`).

const SEQUENCE_DIGITS: usize = 7;

/// Whether `number` has the `NNN-NNN-NNNNNNN` shape.
pub fn is_valid_invoice_number(number: &str) -> bool {
    let parts: Vec<&str> = number.split('-').collect();
    matches!(parts.as_slice(), [est, point, seq]
        if est.len() == 3
            && point.len() == 3
            && seq.len() == SEQUENCE_DIGITS
            && parts.iter().all(|p| p.bytes().all(|b| b.is_ascii_digit())))
}

/// The number following `last` in the same series, or the first number of
/// series `001-001` when there is none.
pub fn next_invoice_number(last: Option<&str>) -> Option<String> {
    let Some(last) = last else {
        return Some(format!("001-001-{:0width$}", 1, width = SEQUENCE_DIGITS));
    };
    if !is_valid_invoice_number(last) {
        return None;
    }
    let (prefix, seq) = last.rsplit_once('-')?;
    let next = seq.parse::<u64>().ok()?.checked_add(1)?;
    if next >= 10u64.pow(SEQUENCE_DIGITS as u32) {
        return None;
    }
    Some(format!("{prefix}-{next:0width$}", width = SEQUENCE_DIGITS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert!(is_valid_invoice_number("001-001-0000001"));
        assert!(!is_valid_invoice_number("001-001-000001"));
        assert!(!is_valid_invoice_number("1-001-0000001"));
        assert!(!is_valid_invoice_number("001-0a1-0000001"));
        assert!(!is_valid_invoice_number("001001-0000001"));
    }

    #[test]
    fn test_next() {
        assert_eq!(next_invoice_number(None).as_deref(), Some("001-001-0000001"));
        assert_eq!(
            next_invoice_number(Some("002-003-0000099")).as_deref(),
            Some("002-003-0000100")
        );
        assert_eq!(next_invoice_number(Some("001-001-9999999")), None);
        assert_eq!(next_invoice_number(Some("garbage")), None);
    }
}
