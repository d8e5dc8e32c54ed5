//! Money calculation utilities using rust_decimal for precision
//!
//! Amounts travel as `f64` on the wire. Every sum or difference shown to the
//! user is computed in `Decimal` and converted back rounded to 2 places.

use rust_decimal::prelude::*;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Convert f64 to Decimal for calculation
///
/// Non-finite input is treated as zero.
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite f64 in monetary calculation, defaulting to zero");
        Decimal::ZERO
    })
}

/// Convert Decimal back to f64, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `unit_price × quantity`
pub fn line_total(unit_price: f64, quantity: u32) -> Decimal {
    to_decimal(unit_price) * Decimal::from(quantity)
}

/// `closing − opening`
pub fn difference(closing: f64, opening: f64) -> f64 {
    to_f64(to_decimal(closing) - to_decimal(opening))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_is_exact() {
        // 0.1 * 3 in f64 is 0.30000000000000004
        assert_eq!(to_f64(line_total(0.1, 3)), 0.3);
        assert_eq!(to_f64(line_total(199.99, 2)), 399.98);
    }

    #[test]
    fn test_difference() {
        assert_eq!(difference(1500.5, 1000.2), 500.3);
        assert_eq!(difference(800.0, 1000.0), -200.0);
    }

    #[test]
    fn test_non_finite_is_zero() {
        assert_eq!(to_decimal(f64::NAN), Decimal::ZERO);
    }
}
