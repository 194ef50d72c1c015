//! Monetary arithmetic for orders.
//!
//! Everything here is pure: amounts in, amounts out, no I/O. All math is
//! done on `BigDecimal` so totals are exact; the only rounding point is the
//! tax computation, which rounds half-up to 2 decimal places (documented
//! behavior, see `tax`).

use bigdecimal::{BigDecimal, RoundingMode, Zero};

use crate::domain::errors::DomainError;

/// Fixed VAT rate of 19%, as `BigDecimal` (19 × 10⁻²).
fn tax_rate() -> BigDecimal {
    BigDecimal::new(19.into(), 2)
}

/// Subtotal of a single line: `unit_price × quantity`.
pub fn line_subtotal(unit_price: &BigDecimal, quantity: i32) -> BigDecimal {
    unit_price * BigDecimal::from(quantity)
}

/// Order subtotal over `(unit_price, quantity)` pairs.
///
/// Fails on a negative price or non-positive quantity; the engine validates
/// these upstream, so hitting the error here means a caller bug.
pub fn subtotal(lines: &[(BigDecimal, i32)]) -> Result<BigDecimal, DomainError> {
    let mut sum = BigDecimal::zero();
    for (unit_price, quantity) in lines {
        if unit_price < &BigDecimal::zero() {
            return Err(DomainError::validation(format!(
                "unit price must not be negative, got {unit_price}"
            )));
        }
        if *quantity <= 0 {
            return Err(DomainError::validation(format!(
                "quantity must be positive, got {quantity}"
            )));
        }
        sum += line_subtotal(unit_price, *quantity);
    }
    Ok(sum)
}

/// Tax owed on `subtotal`: 19%, rounded **half-up** to 2 decimal places.
///
/// Half-up (not banker's rounding) matches how the invoices were issued
/// historically, so e.g. a raw tax of 2.945 becomes 2.95.
pub fn tax(subtotal: &BigDecimal) -> Result<BigDecimal, DomainError> {
    if subtotal < &BigDecimal::zero() {
        return Err(DomainError::validation(format!(
            "subtotal must not be negative, got {subtotal}"
        )));
    }
    Ok((subtotal * tax_rate()).with_scale_round(2, RoundingMode::HalfUp))
}

/// Grand total: `subtotal + tax`.
pub fn total(subtotal: &BigDecimal, tax: &BigDecimal) -> Result<BigDecimal, DomainError> {
    if subtotal < &BigDecimal::zero() || tax < &BigDecimal::zero() {
        return Err(DomainError::validation(
            "subtotal and tax must not be negative".to_string(),
        ));
    }
    Ok(subtotal + tax)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    #[test]
    fn subtotal_sums_price_times_quantity() {
        let lines = vec![(dec("15000"), 2), (dec("12000"), 1)];
        assert_eq!(subtotal(&lines).unwrap(), dec("42000"));
    }

    #[test]
    fn subtotal_of_no_lines_is_zero() {
        assert_eq!(subtotal(&[]).unwrap(), BigDecimal::zero());
    }

    #[test]
    fn subtotal_rejects_negative_price() {
        assert!(matches!(
            subtotal(&[(dec("-1.00"), 1)]),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn subtotal_rejects_zero_quantity() {
        assert!(matches!(
            subtotal(&[(dec("10.00"), 0)]),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn tax_is_19_percent_rounded_to_cents() {
        assert_eq!(tax(&dec("42000")).unwrap(), dec("7980.00"));
        // 99.99 * 0.19 = 18.9981 -> 19.00
        assert_eq!(tax(&dec("99.99")).unwrap(), dec("19.00"));
    }

    #[test]
    fn tax_rounds_half_up_not_half_even() {
        // 15.50 * 0.19 = 2.945; banker's rounding would give 2.94.
        assert_eq!(tax(&dec("15.50")).unwrap(), dec("2.95"));
    }

    #[test]
    fn tax_rejects_negative_subtotal() {
        assert!(matches!(
            tax(&dec("-0.01")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn total_is_subtotal_plus_tax() {
        assert_eq!(total(&dec("42000"), &dec("7980")).unwrap(), dec("49980"));
    }

    #[test]
    fn concrete_invoice_scenario() {
        // Two of product A at 15000, one of product B at 12000.
        let sub = subtotal(&[(dec("15000"), 2), (dec("12000"), 1)]).unwrap();
        let tax = tax(&sub).unwrap();
        let total = total(&sub, &tax).unwrap();
        assert_eq!(sub, dec("42000"));
        assert_eq!(tax, dec("7980"));
        assert_eq!(total, dec("49980"));
    }
}
