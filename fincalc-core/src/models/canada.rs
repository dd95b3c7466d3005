use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// Whether itemized deductions are claimed at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeductionMethod {
    #[default]
    Standard,
    Itemized,
}

impl DeductionMethod {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "none" => Some(Self::Standard),
            "itemized" => Some(Self::Itemized),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CanadaDeduction {
    ChildCare,
    UnionDues,
    MovingExpenses,
    SupportPayments,
    Other,
}

impl CanadaDeduction {
    pub fn all() -> &'static [CanadaDeduction] {
        &[
            CanadaDeduction::ChildCare,
            CanadaDeduction::UnionDues,
            CanadaDeduction::MovingExpenses,
            CanadaDeduction::SupportPayments,
            CanadaDeduction::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChildCare => "child-care",
            Self::UnionDues => "union-dues",
            Self::MovingExpenses => "moving",
            Self::SupportPayments => "support",
            Self::Other => "other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::all().iter().copied().find(|kind| kind.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanadaTaxInput {
    /// Two-letter province code, e.g. `ON`.
    pub province: String,
    pub employment_income: Decimal,
    #[serde(default)]
    pub self_employment_income: Decimal,
    #[serde(default)]
    pub other_income: Decimal,
    /// Realized gains before the inclusion rate is applied.
    #[serde(default)]
    pub capital_gains: Decimal,
    /// Cash dividends before gross-up.
    #[serde(default)]
    pub eligible_dividends: Decimal,
    #[serde(default)]
    pub rrsp_contribution: Decimal,
    #[serde(default)]
    pub deduction_method: DeductionMethod,
    #[serde(default)]
    pub deductions: BTreeMap<CanadaDeduction, Decimal>,
}

impl CanadaTaxInput {
    pub fn new(
        province: impl Into<String>,
        employment_income: Decimal,
    ) -> Self {
        Self {
            province: province.into(),
            employment_income,
            self_employment_income: Decimal::ZERO,
            other_income: Decimal::ZERO,
            capital_gains: Decimal::ZERO,
            eligible_dividends: Decimal::ZERO,
            rrsp_contribution: Decimal::ZERO,
            deduction_method: DeductionMethod::Standard,
            deductions: BTreeMap::new(),
        }
    }

    /// Records an itemized deduction and switches to itemizing.
    pub fn with_deduction(
        mut self,
        kind: CanadaDeduction,
        amount: Decimal,
    ) -> Self {
        self.deduction_method = DeductionMethod::Itemized;
        self.deductions.insert(kind, amount);
        self
    }
}

/// Canada Pension Plan contribution parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppRules {
    pub basic_exemption: Decimal,
    pub max_pensionable_earnings: Decimal,
    pub contribution_rate: Decimal,
}

/// Employment Insurance premium parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EiRules {
    pub max_insurable_earnings: Decimal,
    pub premium_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RrspRules {
    pub dollar_limit: Decimal,
    /// Fraction of earned income that may be deducted.
    pub earned_income_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CanadaDeductionCaps {
    #[serde(default)]
    pub child_care: Option<Decimal>,
    #[serde(default)]
    pub union_dues: Option<Decimal>,
    #[serde(default)]
    pub moving_expenses: Option<Decimal>,
    #[serde(default)]
    pub support_payments: Option<Decimal>,
    #[serde(default)]
    pub other: Option<Decimal>,
}

impl CanadaDeductionCaps {
    pub fn cap_for(
        &self,
        kind: CanadaDeduction,
    ) -> Option<Decimal> {
        match kind {
            CanadaDeduction::ChildCare => self.child_care,
            CanadaDeduction::UnionDues => self.union_dues,
            CanadaDeduction::MovingExpenses => self.moving_expenses,
            CanadaDeduction::SupportPayments => self.support_payments,
            CanadaDeduction::Other => self.other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanadaProfile {
    pub tax_year: i32,
    pub federal: Vec<TaxBracket>,
    /// Keyed by two-letter province code.
    pub provincial: BTreeMap<String, Vec<TaxBracket>>,
    pub cpp: CppRules,
    pub ei: EiRules,
    pub rrsp: RrspRules,
    pub capital_gains_inclusion_rate: Decimal,
    /// Multiplier applied to eligible dividends, e.g. 1.38.
    pub eligible_dividend_gross_up: Decimal,
    #[serde(default)]
    pub deduction_caps: CanadaDeductionCaps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanadaTaxBreakdown {
    pub rrsp_deduction: Decimal,
    pub itemized_deductions: Decimal,
    pub federal_tax: Decimal,
    pub provincial_tax: Decimal,
    pub cpp_contribution: Decimal,
    pub ei_premium: Decimal,
}
