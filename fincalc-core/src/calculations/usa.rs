//! US federal and state income tax.
//!
//! Ordinary income is taxed on the federal schedule for the filing status
//! and on the state's schedule. Long-term capital gains are stacked on top
//! of taxable ordinary income and taxed on the separate 0% / 15% / 20%
//! schedule, so only the gains themselves are taxed at those rates.

use rust_decimal::Decimal;
use tracing::debug;

use crate::TaxBracket;
use crate::calculations::brackets::{compute_bracket_tax, validate_brackets};
use crate::calculations::common::{capped, max, round_half_up};
use crate::calculations::error::TaxCalculationError;
use crate::models::{
    Country, TaxBreakdown, TaxComputationResult, UsaDeduction, UsaProfile, UsaTaxBreakdown,
    UsaTaxInput,
};

#[derive(Debug, Clone)]
pub struct UsaTaxWorksheet<'a> {
    profile: &'a UsaProfile,
}

impl<'a> UsaTaxWorksheet<'a> {
    pub fn new(profile: &'a UsaProfile) -> Self {
        Self { profile }
    }

    pub fn calculate(
        &self,
        input: &UsaTaxInput,
    ) -> Result<TaxComputationResult, TaxCalculationError> {
        let status = input.filing_status;
        let (state, state_brackets) = self.state_schedule(&input.state)?;
        let federal_brackets = self.profile.federal.get(status);
        let ltcg_brackets = self.profile.long_term_capital_gains.get(status);

        validate_brackets(federal_brackets).map_err(|source| {
            TaxCalculationError::malformed(format!("US:federal:{}", status.as_str()), source)
        })?;
        validate_brackets(ltcg_brackets).map_err(|source| {
            TaxCalculationError::malformed(format!("US:ltcg:{}", status.as_str()), source)
        })?;
        validate_brackets(state_brackets).map_err(|source| {
            TaxCalculationError::malformed(format!("US:state:{state}"), source)
        })?;

        let ordinary_income = self.ordinary_income(input);
        let standard_deduction = self.standard_deduction(input);
        let itemized_deductions = self.itemized_deductions(input, ordinary_income);
        let used_itemized_deduction = itemized_deductions > standard_deduction;
        let deductions = max(standard_deduction, itemized_deductions);
        let taxable_income = max(ordinary_income - deductions, Decimal::ZERO);

        let federal_tax = compute_bracket_tax(taxable_income, federal_brackets);
        let state_tax = compute_bracket_tax(taxable_income, state_brackets);
        let long_term_capital_gains_tax =
            self.long_term_capital_gains_tax(taxable_income, input.long_term_capital_gains, ltcg_brackets);

        let tax_before_credits = federal_tax + state_tax + long_term_capital_gains_tax;
        let credits = self.credits(input).min(tax_before_credits);
        let total_tax = tax_before_credits - credits;
        let total_income = ordinary_income + input.long_term_capital_gains;

        debug!(
            %state,
            filing_status = status.as_str(),
            %taxable_income,
            %federal_tax,
            %state_tax,
            %long_term_capital_gains_tax,
            %credits,
            used_itemized_deduction,
            "computed USA income tax"
        );

        let breakdown = UsaTaxBreakdown {
            filing_status: status,
            ordinary_income,
            standard_deduction,
            itemized_deductions,
            used_itemized_deduction,
            federal_tax,
            state_tax,
            long_term_capital_gains_tax,
            credits,
        };

        Ok(TaxComputationResult::from_unrounded(
            Country::UnitedStates,
            Some(state),
            total_income,
            total_income,
            deductions,
            taxable_income,
            TaxBreakdown::UnitedStates(breakdown.rounded()),
            total_tax,
        ))
    }

    fn state_schedule(
        &self,
        state: &str,
    ) -> Result<(String, &'a [TaxBracket]), TaxCalculationError> {
        let code = state.trim().to_ascii_uppercase();
        match self.profile.state.get(&code) {
            Some(brackets) => Ok((code, brackets.as_slice())),
            None => Err(TaxCalculationError::UnsupportedRegion {
                country: Country::UnitedStates,
                region: state.to_string(),
            }),
        }
    }

    /// Wages, dividends, interest and short-term gains.
    fn ordinary_income(
        &self,
        input: &UsaTaxInput,
    ) -> Decimal {
        input.wages + input.dividends + input.interest + input.short_term_capital_gains
    }

    fn standard_deduction(
        &self,
        input: &UsaTaxInput,
    ) -> Decimal {
        let base = *self.profile.standard_deduction.get(input.filing_status);
        if input.age_65_or_older {
            base + *self
                .profile
                .additional_standard_deduction
                .get(input.filing_status)
        } else {
            base
        }
    }

    /// Schedule A total. SALT is capped per filing status and medical
    /// expenses only count above the income floor.
    fn itemized_deductions(
        &self,
        input: &UsaTaxInput,
        ordinary_income: Decimal,
    ) -> Decimal {
        input
            .itemized_deductions
            .iter()
            .map(|(kind, amount)| match kind {
                UsaDeduction::StateAndLocalTaxes => capped(
                    *amount,
                    Some(*self.profile.salt_cap.get(input.filing_status)),
                ),
                UsaDeduction::MedicalExpenses => {
                    let floor = max(ordinary_income, Decimal::ZERO)
                        * self.profile.medical_expense_floor_rate;
                    max(*amount - floor, Decimal::ZERO)
                }
                UsaDeduction::MortgageInterest | UsaDeduction::CharitableContributions => {
                    capped(*amount, None)
                }
            })
            .sum()
    }

    fn long_term_capital_gains_tax(
        &self,
        taxable_income: Decimal,
        gains: Decimal,
        brackets: &[TaxBracket],
    ) -> Decimal {
        if gains <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        compute_bracket_tax(taxable_income + gains, brackets)
            - compute_bracket_tax(taxable_income, brackets)
    }

    /// Claimed credits, each clipped to its cap.
    fn credits(
        &self,
        input: &UsaTaxInput,
    ) -> Decimal {
        input
            .credits
            .iter()
            .map(|(kind, amount)| capped(*amount, self.profile.credit_caps.cap_for(*kind)))
            .sum()
    }
}

impl UsaTaxBreakdown {
    fn rounded(self) -> Self {
        Self {
            filing_status: self.filing_status,
            ordinary_income: round_half_up(self.ordinary_income),
            standard_deduction: round_half_up(self.standard_deduction),
            itemized_deductions: round_half_up(self.itemized_deductions),
            used_itemized_deduction: self.used_itemized_deduction,
            federal_tax: round_half_up(self.federal_tax),
            state_tax: round_half_up(self.state_tax),
            long_term_capital_gains_tax: round_half_up(self.long_term_capital_gains_tax),
            credits: round_half_up(self.credits),
        }
    }
}
