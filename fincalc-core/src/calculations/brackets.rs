//! Progressive bracket tax engine.
//!
//! Every jurisdiction in this crate reduces its income tax to one or more
//! calls into this module: walk an ascending schedule, tax the part of the
//! remaining amount that fits inside each bracket at that bracket's rate,
//! and stop once nothing remains.
//!
//! No rounding happens here. Callers round once, at the result boundary.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::TaxBracket;
//! use fincalc_core::calculations::BracketTaxEngine;
//!
//! let brackets = vec![
//!     TaxBracket::bounded(dec!(0), dec!(250000), dec!(0)),
//!     TaxBracket::bounded(dec!(250000), dec!(500000), dec!(0.05)),
//!     TaxBracket::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
//!     TaxBracket::unbounded(dec!(1000000), dec!(0.30)),
//! ];
//!
//! let engine = BracketTaxEngine::new(&brackets);
//! engine.validate().unwrap();
//!
//! assert_eq!(engine.calculate(dec!(600000)), dec!(32500));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::TaxBracket;
use crate::calculations::common::max;

/// A bracket schedule is not well formed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("no tax brackets provided")]
    Empty,

    #[error("first bracket must start at zero, got {0}")]
    DoesNotStartAtZero(Decimal),

    #[error("bracket {index} starts at {found} but the previous bracket ends at {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} upper bound {max_income} is not above its lower bound {min_income}")]
    EmptySpan {
        index: usize,
        min_income: Decimal,
        max_income: Decimal,
    },

    #[error("bracket {0} is unbounded but is not the last bracket")]
    UnboundedNotLast(usize),

    #[error("bracket {index} has rate {rate} outside [0, 1]")]
    InvalidRate { index: usize, rate: Decimal },
}

/// The portion of an amount that fell inside one bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSlice {
    pub bracket: TaxBracket,
    pub taxed_amount: Decimal,
    pub tax: Decimal,
}

/// Checks that a schedule starts at zero, is contiguous and ascending, and
/// only its final bracket is open-ended.
///
/// A cap on the final bracket is allowed and ignored by the engine.
pub fn validate_brackets(brackets: &[TaxBracket]) -> Result<(), BracketError> {
    let first = brackets.first().ok_or(BracketError::Empty)?;
    if first.min_income != Decimal::ZERO {
        return Err(BracketError::DoesNotStartAtZero(first.min_income));
    }

    let last = brackets.len() - 1;
    let mut expected_min = Decimal::ZERO;

    for (index, bracket) in brackets.iter().enumerate() {
        if bracket.tax_rate < Decimal::ZERO || bracket.tax_rate > Decimal::ONE {
            return Err(BracketError::InvalidRate {
                index,
                rate: bracket.tax_rate,
            });
        }

        if bracket.min_income != expected_min {
            return Err(BracketError::NotContiguous {
                index,
                expected: expected_min,
                found: bracket.min_income,
            });
        }

        match bracket.max_income {
            Some(max_income) if max_income <= bracket.min_income => {
                return Err(BracketError::EmptySpan {
                    index,
                    min_income: bracket.min_income,
                    max_income,
                });
            }
            Some(max_income) => expected_min = max_income,
            None if index != last => return Err(BracketError::UnboundedNotLast(index)),
            None => {}
        }
    }

    Ok(())
}

/// Splits `taxable_amount` across the schedule.
///
/// Brackets that receive nothing are omitted, so the slices stop at the
/// bracket holding the last unit of income. The final bracket is treated as
/// unbounded whatever its cap says.
pub fn bracket_breakdown(
    taxable_amount: Decimal,
    brackets: &[TaxBracket],
) -> Vec<BracketSlice> {
    let mut slices = Vec::new();
    let mut remaining = taxable_amount;
    let last = brackets.len().saturating_sub(1);

    for (index, bracket) in brackets.iter().enumerate() {
        if remaining <= Decimal::ZERO {
            break;
        }

        let taxed_amount = match bracket.span() {
            Some(span) if index < last => remaining.min(span),
            _ => remaining,
        };

        slices.push(BracketSlice {
            bracket: bracket.clone(),
            taxed_amount,
            tax: taxed_amount * bracket.tax_rate,
        });
        remaining -= taxed_amount;
    }

    slices
}

/// Progressive tax on `taxable_amount`. Zero or negative amounts owe nothing.
pub fn compute_bracket_tax(
    taxable_amount: Decimal,
    brackets: &[TaxBracket],
) -> Decimal {
    bracket_breakdown(taxable_amount, brackets)
        .iter()
        .map(|slice| slice.tax)
        .sum()
}

/// Rate applied to the last unit of `taxable_amount`.
pub fn marginal_rate(
    taxable_amount: Decimal,
    brackets: &[TaxBracket],
) -> Option<Decimal> {
    bracket_breakdown(taxable_amount, brackets)
        .last()
        .map(|slice| slice.bracket.tax_rate)
        .or_else(|| brackets.first().map(|b| b.tax_rate))
}

/// Rewrites a schedule so that income up to `exemption` is untaxed.
///
/// Brackets entirely below the exemption are dropped and the one straddling
/// it is clipped to start there.
pub fn with_basic_exemption(
    brackets: &[TaxBracket],
    exemption: Decimal,
) -> Vec<TaxBracket> {
    if exemption <= Decimal::ZERO {
        return brackets.to_vec();
    }

    let mut out = vec![TaxBracket::bounded(Decimal::ZERO, exemption, Decimal::ZERO)];
    for bracket in brackets {
        if matches!(bracket.max_income, Some(max_income) if max_income <= exemption) {
            continue;
        }
        out.push(TaxBracket {
            min_income: max(bracket.min_income, exemption),
            max_income: bracket.max_income,
            tax_rate: bracket.tax_rate,
        });
    }
    out
}

/// Borrowing wrapper over a single schedule.
#[derive(Debug, Clone)]
pub struct BracketTaxEngine<'a> {
    brackets: &'a [TaxBracket],
}

impl<'a> BracketTaxEngine<'a> {
    /// Brackets should be sorted by `min_income` in ascending order; call
    /// [`validate`](Self::validate) before trusting a schedule from
    /// configuration.
    pub fn new(brackets: &'a [TaxBracket]) -> Self {
        Self { brackets }
    }

    pub fn validate(&self) -> Result<(), BracketError> {
        validate_brackets(self.brackets)
    }

    pub fn calculate(
        &self,
        taxable_amount: Decimal,
    ) -> Decimal {
        compute_bracket_tax(taxable_amount, self.brackets)
    }

    pub fn breakdown(
        &self,
        taxable_amount: Decimal,
    ) -> Vec<BracketSlice> {
        bracket_breakdown(taxable_amount, self.brackets)
    }

    pub fn marginal_rate(
        &self,
        taxable_amount: Decimal,
    ) -> Option<Decimal> {
        marginal_rate(taxable_amount, self.brackets)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;

    fn india_old_regime() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(dec!(0), dec!(250000), dec!(0)),
            TaxBracket::bounded(dec!(250000), dec!(500000), dec!(0.05)),
            TaxBracket::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
            TaxBracket::unbounded(dec!(1000000), dec!(0.30)),
        ]
    }

    fn us_single_2023() -> Vec<TaxBracket> {
        vec![
            TaxBracket::bounded(dec!(0), dec!(11000), dec!(0.10)),
            TaxBracket::bounded(dec!(11000), dec!(44725), dec!(0.12)),
            TaxBracket::bounded(dec!(44725), dec!(95375), dec!(0.22)),
            TaxBracket::bounded(dec!(95375), dec!(182100), dec!(0.24)),
            TaxBracket::bounded(dec!(182100), dec!(231250), dec!(0.32)),
            TaxBracket::bounded(dec!(231250), dec!(578125), dec!(0.35)),
            TaxBracket::unbounded(dec!(578125), dec!(0.37)),
        ]
    }

    // =========================================================================
    // compute_bracket_tax tests
    // =========================================================================

    #[test]
    fn compute_bracket_tax_spans_two_paid_brackets() {
        let result = compute_bracket_tax(dec!(600000), &india_old_regime());

        // 250,000 x 5% + 100,000 x 20%
        assert_eq!(result, dec!(32500));
    }

    #[test]
    fn compute_bracket_tax_zero_amount_is_zero() {
        assert_eq!(compute_bracket_tax(dec!(0), &india_old_regime()), dec!(0));
    }

    #[test]
    fn compute_bracket_tax_negative_amount_is_zero() {
        assert_eq!(compute_bracket_tax(dec!(-5000), &us_single_2023()), dec!(0));
    }

    #[test]
    fn compute_bracket_tax_reaches_unbounded_top_bracket() {
        let result = compute_bracket_tax(dec!(2000000), &india_old_regime());

        // 12,500 + 100,000 + 1,000,000 x 30%
        assert_eq!(result, dec!(412500));
    }

    #[test]
    fn compute_bracket_tax_keeps_fractional_cents() {
        let result = compute_bracket_tax(dec!(11000.05), &us_single_2023());

        assert_eq!(result, dec!(1100.006));
    }

    #[test]
    fn compute_bracket_tax_ignores_cap_on_final_bracket() {
        let brackets = vec![
            TaxBracket::bounded(dec!(0), dec!(100), dec!(0.10)),
            TaxBracket::bounded(dec!(100), dec!(200), dec!(0.20)),
        ];

        assert_eq!(compute_bracket_tax(dec!(500), &brackets), dec!(90));
    }

    #[test]
    fn compute_bracket_tax_empty_schedule_is_zero() {
        assert_eq!(compute_bracket_tax(dec!(500), &[]), dec!(0));
    }

    // =========================================================================
    // bracket_breakdown / marginal_rate tests
    // =========================================================================

    #[test]
    fn bracket_breakdown_stops_at_last_touched_bracket() {
        let slices = bracket_breakdown(dec!(600000), &india_old_regime());

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[1].taxed_amount, dec!(250000));
        assert_eq!(slices[2].taxed_amount, dec!(100000));
        assert_eq!(slices[2].tax, dec!(20000));
    }

    #[test]
    fn marginal_rate_reports_bracket_of_last_unit() {
        assert_eq!(marginal_rate(dec!(50000), &us_single_2023()), Some(dec!(0.22)));
        assert_eq!(marginal_rate(dec!(44725), &us_single_2023()), Some(dec!(0.12)));
    }

    #[test]
    fn marginal_rate_for_zero_income_is_first_rate() {
        assert_eq!(marginal_rate(dec!(0), &us_single_2023()), Some(dec!(0.10)));
        assert_eq!(marginal_rate(dec!(0), &[]), None);
    }

    // =========================================================================
    // validate_brackets tests
    // =========================================================================

    #[test]
    fn validate_accepts_well_formed_schedule() {
        assert_eq!(validate_brackets(&us_single_2023()), Ok(()));
    }

    #[test]
    fn validate_rejects_empty_schedule() {
        assert_eq!(validate_brackets(&[]), Err(BracketError::Empty));
    }

    #[test]
    fn validate_rejects_nonzero_start() {
        let brackets = vec![TaxBracket::unbounded(dec!(10), dec!(0.1))];

        assert_eq!(
            validate_brackets(&brackets),
            Err(BracketError::DoesNotStartAtZero(dec!(10)))
        );
    }

    #[test]
    fn validate_rejects_gap() {
        let brackets = vec![
            TaxBracket::bounded(dec!(0), dec!(100), dec!(0.1)),
            TaxBracket::unbounded(dec!(150), dec!(0.2)),
        ];

        assert_eq!(
            validate_brackets(&brackets),
            Err(BracketError::NotContiguous {
                index: 1,
                expected: dec!(100),
                found: dec!(150),
            })
        );
    }

    #[test]
    fn validate_rejects_unbounded_middle_bracket() {
        let brackets = vec![
            TaxBracket::unbounded(dec!(0), dec!(0.1)),
            TaxBracket::unbounded(dec!(100), dec!(0.2)),
        ];

        assert_eq!(
            validate_brackets(&brackets),
            Err(BracketError::UnboundedNotLast(0))
        );
    }

    #[test]
    fn validate_rejects_inverted_span() {
        let brackets = vec![
            TaxBracket::bounded(dec!(0), dec!(0), dec!(0.1)),
            TaxBracket::unbounded(dec!(0), dec!(0.2)),
        ];

        assert!(matches!(
            validate_brackets(&brackets),
            Err(BracketError::EmptySpan { index: 0, .. })
        ));
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let brackets = vec![TaxBracket::unbounded(dec!(0), dec!(30))];

        assert_eq!(
            validate_brackets(&brackets),
            Err(BracketError::InvalidRate {
                index: 0,
                rate: dec!(30)
            })
        );
    }

    // =========================================================================
    // with_basic_exemption tests
    // =========================================================================

    #[test]
    fn with_basic_exemption_at_existing_boundary_is_identity() {
        let brackets = india_old_regime();

        assert_eq!(with_basic_exemption(&brackets, dec!(250000)), brackets);
    }

    #[test]
    fn with_basic_exemption_clips_straddling_bracket() {
        let shifted = with_basic_exemption(&india_old_regime(), dec!(300000));

        assert_eq!(
            shifted,
            vec![
                TaxBracket::bounded(dec!(0), dec!(300000), dec!(0)),
                TaxBracket::bounded(dec!(300000), dec!(500000), dec!(0.05)),
                TaxBracket::bounded(dec!(500000), dec!(1000000), dec!(0.20)),
                TaxBracket::unbounded(dec!(1000000), dec!(0.30)),
            ]
        );
        assert_eq!(validate_brackets(&shifted), Ok(()));
    }

    #[test]
    fn with_basic_exemption_drops_swallowed_brackets() {
        let shifted = with_basic_exemption(&india_old_regime(), dec!(500000));

        assert_eq!(shifted.len(), 3);
        assert_eq!(compute_bracket_tax(dec!(600000), &shifted), dec!(20000));
    }

    // =========================================================================
    // properties
    // =========================================================================

    proptest! {
        #[test]
        fn prop_tax_is_monotonic_in_amount(a in 0u64..5_000_000, b in 0u64..5_000_000) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let brackets = us_single_2023();

            prop_assert!(
                compute_bracket_tax(Decimal::from(low), &brackets)
                    <= compute_bracket_tax(Decimal::from(high), &brackets)
            );
        }

        #[test]
        fn prop_slices_cover_amount_and_sum_to_tax(cents in 0i64..500_000_000) {
            let amount = Decimal::new(cents, 2);
            let brackets = india_old_regime();
            let slices = bracket_breakdown(amount, &brackets);

            let covered: Decimal = slices.iter().map(|s| s.taxed_amount).sum();
            let tax: Decimal = slices.iter().map(|s| s.tax).sum();

            prop_assert_eq!(covered, amount);
            prop_assert_eq!(tax, compute_bracket_tax(amount, &brackets));
        }
    }
}
