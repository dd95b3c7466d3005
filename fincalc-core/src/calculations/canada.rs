//! Canadian federal and provincial income tax plus CPP and EI payroll
//! deductions.
//!
//! Federal and provincial tax are both computed by the bracket engine on the
//! same taxable income. Payroll contributions are computed on earnings, not
//! on taxable income.

use rust_decimal::Decimal;
use tracing::debug;

use crate::TaxBracket;
use crate::calculations::brackets::{compute_bracket_tax, validate_brackets};
use crate::calculations::common::{capped, max, round_half_up};
use crate::calculations::error::TaxCalculationError;
use crate::models::{
    CanadaProfile, CanadaTaxBreakdown, CanadaTaxInput, Country, DeductionMethod, TaxBreakdown,
    TaxComputationResult,
};

#[derive(Debug, Clone)]
pub struct CanadaTaxWorksheet<'a> {
    profile: &'a CanadaProfile,
}

impl<'a> CanadaTaxWorksheet<'a> {
    pub fn new(profile: &'a CanadaProfile) -> Self {
        Self { profile }
    }

    pub fn calculate(
        &self,
        input: &CanadaTaxInput,
    ) -> Result<TaxComputationResult, TaxCalculationError> {
        let (province, provincial) = self.provincial_schedule(&input.province)?;
        validate_brackets(&self.profile.federal)
            .map_err(|source| TaxCalculationError::malformed("CA:federal", source))?;
        validate_brackets(provincial).map_err(|source| {
            TaxCalculationError::malformed(format!("CA:provincial:{province}"), source)
        })?;

        let total_income = self.total_income(input);
        let rrsp_deduction = self.rrsp_deduction(input);
        let itemized_deductions = self.itemized_deductions(input);
        let deductions = rrsp_deduction + itemized_deductions;
        let taxable_income = max(total_income - deductions, Decimal::ZERO);

        let federal_tax = compute_bracket_tax(taxable_income, &self.profile.federal);
        let provincial_tax = compute_bracket_tax(taxable_income, provincial);
        let cpp_contribution = self.cpp_contribution(input);
        let ei_premium = self.ei_premium(input);
        let total_tax = federal_tax + provincial_tax + cpp_contribution + ei_premium;

        debug!(
            %province,
            %taxable_income,
            %federal_tax,
            %provincial_tax,
            %cpp_contribution,
            %ei_premium,
            "computed Canada income tax"
        );

        let breakdown = CanadaTaxBreakdown {
            rrsp_deduction,
            itemized_deductions,
            federal_tax,
            provincial_tax,
            cpp_contribution,
            ei_premium,
        };

        Ok(TaxComputationResult::from_unrounded(
            Country::Canada,
            Some(province),
            self.gross_income(input),
            total_income,
            deductions,
            taxable_income,
            TaxBreakdown::Canada(breakdown.rounded()),
            total_tax,
        ))
    }

    /// Looks up a province by code, ignoring case and surrounding whitespace.
    fn provincial_schedule(
        &self,
        province: &str,
    ) -> Result<(String, &'a [TaxBracket]), TaxCalculationError> {
        let code = province.trim().to_ascii_uppercase();
        match self.profile.provincial.get(&code) {
            Some(brackets) => Ok((code, brackets.as_slice())),
            None => Err(TaxCalculationError::UnsupportedRegion {
                country: Country::Canada,
                region: province.to_string(),
            }),
        }
    }

    /// Employment, self-employment and other income, plus the taxable share of
    /// capital gains and grossed-up eligible dividends.
    /// Cash received, before the capital gains inclusion rate and the
    /// dividend gross-up.
    fn gross_income(
        &self,
        input: &CanadaTaxInput,
    ) -> Decimal {
        input.employment_income
            + input.self_employment_income
            + input.other_income
            + input.capital_gains
            + input.eligible_dividends
    }

    fn total_income(
        &self,
        input: &CanadaTaxInput,
    ) -> Decimal {
        input.employment_income
            + input.self_employment_income
            + input.other_income
            + input.capital_gains * self.profile.capital_gains_inclusion_rate
            + input.eligible_dividends * self.profile.eligible_dividend_gross_up
    }

    fn earned_income(
        &self,
        input: &CanadaTaxInput,
    ) -> Decimal {
        max(
            input.employment_income + input.self_employment_income,
            Decimal::ZERO,
        )
    }

    fn rrsp_deduction(
        &self,
        input: &CanadaTaxInput,
    ) -> Decimal {
        let rules = &self.profile.rrsp;
        let room = (self.earned_income(input) * rules.earned_income_rate).min(rules.dollar_limit);
        capped(input.rrsp_contribution, Some(room))
    }

    fn itemized_deductions(
        &self,
        input: &CanadaTaxInput,
    ) -> Decimal {
        if input.deduction_method == DeductionMethod::Standard {
            return Decimal::ZERO;
        }
        input
            .deductions
            .iter()
            .map(|(kind, amount)| capped(*amount, self.profile.deduction_caps.cap_for(*kind)))
            .sum()
    }

    fn cpp_contribution(
        &self,
        input: &CanadaTaxInput,
    ) -> Decimal {
        let rules = &self.profile.cpp;
        let contributory = max(self.earned_income(input) - rules.basic_exemption, Decimal::ZERO);
        let ceiling = rules.max_pensionable_earnings - rules.basic_exemption;
        contributory.min(ceiling) * rules.contribution_rate
    }

    fn ei_premium(
        &self,
        input: &CanadaTaxInput,
    ) -> Decimal {
        let rules = &self.profile.ei;
        max(input.employment_income, Decimal::ZERO).min(rules.max_insurable_earnings)
            * rules.premium_rate
    }
}

impl CanadaTaxBreakdown {
    fn rounded(self) -> Self {
        Self {
            rrsp_deduction: round_half_up(self.rrsp_deduction),
            itemized_deductions: round_half_up(self.itemized_deductions),
            federal_tax: round_half_up(self.federal_tax),
            provincial_tax: round_half_up(self.provincial_tax),
            cpp_contribution: round_half_up(self.cpp_contribution),
            ei_premium: round_half_up(self.ei_premium),
        }
    }
}
