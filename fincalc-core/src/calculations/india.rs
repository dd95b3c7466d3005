//! Indian individual income tax, old and new regimes.
//!
//! The computation runs in a fixed order:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Standard deduction (salaried taxpayers only) |
//! | 2    | Capped deductions (old regime only) |
//! | 3    | Taxable income (gross - steps 1 and 2, minimum 0) |
//! | 4    | Slab tax; old regime schedule starts at the age-based exemption |
//! | 5    | Section 87A rebate (step 4 is zeroed at or below the threshold) |
//! | 6    | Surcharge on tax after rebate, highest tier exceeded |
//! | 7    | Health and education cess on tax plus surcharge |
//! | 8    | Capital gains tax at flat rates, outside the slabs |

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::brackets::{compute_bracket_tax, validate_brackets, with_basic_exemption};
use crate::calculations::common::{capped, max, round_half_up};
use crate::calculations::error::TaxCalculationError;
use crate::models::{
    Country, IndiaProfile, IndiaTaxBreakdown, IndiaTaxInput, RegimeRules, TaxBreakdown,
    TaxComputationResult, TaxRegime,
};

/// Computes Indian income tax against one financial year's profile.
#[derive(Debug, Clone)]
pub struct IndiaTaxWorksheet<'a> {
    profile: &'a IndiaProfile,
}

impl<'a> IndiaTaxWorksheet<'a> {
    pub fn new(profile: &'a IndiaProfile) -> Self {
        Self { profile }
    }

    pub fn calculate(
        &self,
        input: &IndiaTaxInput,
    ) -> Result<TaxComputationResult, TaxCalculationError> {
        let rules = self.profile.regime(input.regime);
        validate_brackets(&rules.brackets).map_err(|source| {
            TaxCalculationError::malformed(format!("IN:{}", input.regime.as_str()), source)
        })?;

        let standard_deduction = self.standard_deduction(input, rules);
        let claimed_deductions = self.claimed_deductions(input);
        let taxable_income = self.taxable_income(
            input.gross_income,
            standard_deduction + claimed_deductions,
        );

        let slab_tax = self.slab_tax(input, rules, taxable_income);
        let rebate = self.rebate(taxable_income, slab_tax, rules);
        let tax_after_rebate = slab_tax - rebate;
        let surcharge = self.surcharge(taxable_income, tax_after_rebate, rules);
        let cess = self.cess(tax_after_rebate + surcharge);
        let capital_gains_tax = self.capital_gains_tax(input);

        let total_income =
            input.gross_income + input.short_term_capital_gains + input.long_term_capital_gains;
        let total_tax = tax_after_rebate + surcharge + cess + capital_gains_tax;

        debug!(
            regime = input.regime.as_str(),
            %taxable_income,
            %slab_tax,
            %rebate,
            %surcharge,
            %cess,
            %capital_gains_tax,
            "computed India income tax"
        );

        let breakdown = IndiaTaxBreakdown {
            regime: input.regime,
            standard_deduction,
            claimed_deductions,
            slab_tax,
            rebate,
            surcharge,
            cess,
            capital_gains_tax,
        };

        Ok(TaxComputationResult::from_unrounded(
            Country::India,
            None,
            total_income,
            total_income,
            standard_deduction + claimed_deductions,
            taxable_income,
            TaxBreakdown::India(breakdown.rounded()),
            total_tax,
        ))
    }

    /// Flat deduction from salary, never more than the salary itself.
    fn standard_deduction(
        &self,
        input: &IndiaTaxInput,
        rules: &RegimeRules,
    ) -> Decimal {
        if !input.salaried {
            return Decimal::ZERO;
        }
        rules
            .standard_deduction
            .min(max(input.gross_income, Decimal::ZERO))
    }

    /// Sum of each claimed deduction clipped to its own cap. The new regime
    /// allows none of them.
    fn claimed_deductions(
        &self,
        input: &IndiaTaxInput,
    ) -> Decimal {
        if input.regime == TaxRegime::New {
            return Decimal::ZERO;
        }
        input
            .deductions
            .iter()
            .map(|(kind, amount)| {
                capped(*amount, self.profile.deduction_caps.cap_for(*kind, input.age))
            })
            .sum()
    }

    fn taxable_income(
        &self,
        gross_income: Decimal,
        deductions: Decimal,
    ) -> Decimal {
        max(gross_income - deductions, Decimal::ZERO)
    }

    fn slab_tax(
        &self,
        input: &IndiaTaxInput,
        rules: &RegimeRules,
        taxable_income: Decimal,
    ) -> Decimal {
        match input.regime {
            TaxRegime::Old => {
                let exemption = self.profile.basic_exemption.for_age(input.age);
                let schedule = with_basic_exemption(&rules.brackets, exemption);
                compute_bracket_tax(taxable_income, &schedule)
            }
            TaxRegime::New => compute_bracket_tax(taxable_income, &rules.brackets),
        }
    }

    fn rebate(
        &self,
        taxable_income: Decimal,
        slab_tax: Decimal,
        rules: &RegimeRules,
    ) -> Decimal {
        if taxable_income <= rules.rebate_threshold {
            slab_tax
        } else {
            Decimal::ZERO
        }
    }

    fn surcharge(
        &self,
        taxable_income: Decimal,
        tax: Decimal,
        rules: &RegimeRules,
    ) -> Decimal {
        rules
            .surcharge_tiers
            .iter()
            .filter(|tier| taxable_income > tier.threshold)
            .map(|tier| tier.rate)
            .max()
            .map_or(Decimal::ZERO, |rate| tax * rate)
    }

    fn cess(
        &self,
        tax: Decimal,
    ) -> Decimal {
        tax * self.profile.cess_rate
    }

    fn capital_gains_tax(
        &self,
        input: &IndiaTaxInput,
    ) -> Decimal {
        let short_term =
            max(input.short_term_capital_gains, Decimal::ZERO) * self.profile.short_term_capital_gains_rate;
        let long_term = max(
            input.long_term_capital_gains - self.profile.long_term_capital_gains_exemption,
            Decimal::ZERO,
        ) * self.profile.long_term_capital_gains_rate;
        short_term + long_term
    }
}

impl IndiaTaxBreakdown {
    fn rounded(self) -> Self {
        Self {
            regime: self.regime,
            standard_deduction: round_half_up(self.standard_deduction),
            claimed_deductions: round_half_up(self.claimed_deductions),
            slab_tax: round_half_up(self.slab_tax),
            rebate: round_half_up(self.rebate),
            surcharge: round_half_up(self.surcharge),
            cess: round_half_up(self.cess),
            capital_gains_tax: round_half_up(self.capital_gains_tax),
        }
    }
}
