use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{effective_rate, round_half_up};

use super::{
    CanadaTaxBreakdown, CanadaTaxInput, Country, IndiaTaxBreakdown, IndiaTaxInput,
    UsaTaxBreakdown, UsaTaxInput,
};

/// Input to a tax computation, one variant per jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxComputationInput {
    India(IndiaTaxInput),
    Canada(CanadaTaxInput),
    UnitedStates(UsaTaxInput),
}

impl TaxComputationInput {
    pub fn country(&self) -> Country {
        match self {
            Self::India(_) => Country::India,
            Self::Canada(_) => Country::Canada,
            Self::UnitedStates(_) => Country::UnitedStates,
        }
    }

    pub fn region(&self) -> Option<&str> {
        match self {
            Self::India(_) => None,
            Self::Canada(input) => Some(&input.province),
            Self::UnitedStates(input) => Some(&input.state),
        }
    }
}

/// Jurisdiction-specific itemized components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxBreakdown {
    India(IndiaTaxBreakdown),
    Canada(CanadaTaxBreakdown),
    UnitedStates(UsaTaxBreakdown),
}

/// Outcome of a tax computation. Money is rounded to cents and the effective
/// rate is a percentage rounded to two places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxComputationResult {
    pub country: Country,
    pub region: Option<String>,
    /// Income actually received. Net income and the effective rate are
    /// measured against this figure.
    pub gross_income: Decimal,
    /// Income as assessed, after any inclusion rates or gross-ups.
    pub total_income: Decimal,
    pub deductions: Decimal,
    pub taxable_income: Decimal,
    pub breakdown: TaxBreakdown,
    pub total_tax: Decimal,
    pub net_income: Decimal,
    pub effective_rate: Decimal,
}

impl TaxComputationResult {
    /// Rounds the summary figures and derives net income and effective rate
    /// from the unrounded totals.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_unrounded(
        country: Country,
        region: Option<String>,
        gross_income: Decimal,
        total_income: Decimal,
        deductions: Decimal,
        taxable_income: Decimal,
        breakdown: TaxBreakdown,
        total_tax: Decimal,
    ) -> Self {
        Self {
            country,
            region,
            gross_income: round_half_up(gross_income),
            total_income: round_half_up(total_income),
            deductions: round_half_up(deductions),
            taxable_income: round_half_up(taxable_income),
            breakdown,
            total_tax: round_half_up(total_tax),
            net_income: round_half_up(gross_income - total_tax),
            effective_rate: round_half_up(effective_rate(total_tax, gross_income)),
        }
    }
}
