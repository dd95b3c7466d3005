//! Common utility functions for tax and projection calculations.
//!
//! This module provides shared functionality used across the jurisdiction
//! calculators and the investment projection, including rounding, capping
//! and rate helpers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// This follows standard financial rounding conventions where values at exactly
/// 0.005 are rounded up to 0.01 (away from zero).
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// assert_eq!(round_half_up(dec!(5000.0)).to_string(), "5000.00");
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Rounds to whole currency units, half away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::round_whole;
///
/// assert_eq!(round_whole(dec!(112682.503)), dec!(112683));
/// assert_eq!(round_whole(dec!(-10.5)), dec!(-11));
/// ```
pub fn round_whole(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Clamps a claimed amount to `[0, cap]`; `None` leaves it uncapped.
pub fn capped(
    amount: Decimal,
    cap: Option<Decimal>,
) -> Decimal {
    let amount = max(amount, Decimal::ZERO);
    match cap {
        Some(cap) => amount.min(cap),
        None => amount,
    }
}

/// `tax / income` as a percentage; zero when there is no income.
pub fn effective_rate(
    tax: Decimal,
    income: Decimal,
) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    tax / income * Decimal::ONE_HUNDRED
}
