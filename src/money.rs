//! Decimal money helpers
//!
//! All balance mutations work on exact `rust_decimal::Decimal` values and
//! settle at 2 decimal places. Rounding is half-up (midpoint away from zero),
//! matching the quantize behaviour the ledger tables were seeded with.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal::prelude::*;

/// Fixed component of the withdrawal fee (EUR).
pub const WITHDRAWAL_FEE_FIXED: Decimal = Decimal::from_parts(100, 0, 0, false, 2); // 1.00

/// Variable component of the withdrawal fee: 0.5% of the amount.
pub const WITHDRAWAL_FEE_RATE: Decimal = Decimal::from_parts(5, 0, 0, false, 3); // 0.005

/// Round to 2 decimal places, half-up.
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Withdrawal fee: `max(amount * 0.5%, 1.00)`, 2dp.
pub fn withdrawal_fee(amount: Decimal) -> Decimal {
    let variable = round2(amount * WITHDRAWAL_FEE_RATE);
    variable.max(WITHDRAWAL_FEE_FIXED)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn round2_half_up() {
        assert_eq!(round2(dec("1.005")), dec("1.01"));
        assert_eq!(round2(dec("1.004")), dec("1.00"));
        assert_eq!(round2(dec("999.999")), dec("1000.00"));
        assert_eq!(round2(dec("0.125")), dec("0.13"));
    }

    #[test]
    fn fee_floor_applies_to_small_amounts() {
        // 100.00 * 0.5% = 0.50 -> floored to the fixed 1.00
        assert_eq!(withdrawal_fee(dec("100.00")), dec("1.00"));
        assert_eq!(withdrawal_fee(dec("10.00")), dec("1.00"));
    }

    #[test]
    fn fee_variable_beyond_floor() {
        // 500.00 * 0.5% = 2.50
        assert_eq!(withdrawal_fee(dec("500.00")), dec("2.50"));
        // 200.00 * 0.5% = 1.00, exactly at the floor
        assert_eq!(withdrawal_fee(dec("200.00")), dec("1.00"));
        assert_eq!(withdrawal_fee(dec("200.01")), dec("1.00"));
        assert_eq!(withdrawal_fee(dec("201.00")), dec("1.01"));
    }

    #[test]
    fn fee_rounds_half_up() {
        // 301.00 * 0.5% = 1.505 -> 1.51
        assert_eq!(withdrawal_fee(dec("301.00")), dec("1.51"));
    }

    #[test]
    fn withdrawal_of_100_eur_debits_101_total() {
        let amount = dec("100.00");
        let fee = withdrawal_fee(amount);
        assert_eq!(fee, dec("1.00"));
        assert_eq!(round2(amount + fee), dec("101.00"));
    }
}
