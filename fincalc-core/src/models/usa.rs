use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{FilingStatus, FilingStatusTable, TaxBracket};

/// Schedule A categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UsaDeduction {
    StateAndLocalTaxes,
    MortgageInterest,
    CharitableContributions,
    /// Only the part above the AGI floor is deductible.
    MedicalExpenses,
}

impl UsaDeduction {
    pub fn all() -> &'static [UsaDeduction] {
        &[
            UsaDeduction::StateAndLocalTaxes,
            UsaDeduction::MortgageInterest,
            UsaDeduction::CharitableContributions,
            UsaDeduction::MedicalExpenses,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StateAndLocalTaxes => "salt",
            Self::MortgageInterest => "mortgage",
            Self::CharitableContributions => "charity",
            Self::MedicalExpenses => "medical",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::all().iter().copied().find(|kind| kind.as_str() == s)
    }
}

/// Nonrefundable credits subtracted from total tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UsaCredit {
    ChildTax,
    DependentCare,
    Education,
    Energy,
}

impl UsaCredit {
    pub fn all() -> &'static [UsaCredit] {
        &[
            UsaCredit::ChildTax,
            UsaCredit::DependentCare,
            UsaCredit::Education,
            UsaCredit::Energy,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChildTax => "child",
            Self::DependentCare => "dependent-care",
            Self::Education => "education",
            Self::Energy => "energy",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase();
        Self::all().iter().copied().find(|kind| kind.as_str() == s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsaTaxInput {
    /// Two-letter state code, e.g. `CA`.
    pub state: String,
    pub filing_status: FilingStatus,
    #[serde(default)]
    pub age_65_or_older: bool,
    pub wages: Decimal,
    #[serde(default)]
    pub dividends: Decimal,
    #[serde(default)]
    pub interest: Decimal,
    #[serde(default)]
    pub short_term_capital_gains: Decimal,
    #[serde(default)]
    pub long_term_capital_gains: Decimal,
    #[serde(default)]
    pub itemized_deductions: BTreeMap<UsaDeduction, Decimal>,
    #[serde(default)]
    pub credits: BTreeMap<UsaCredit, Decimal>,
}

impl UsaTaxInput {
    pub fn new(
        state: impl Into<String>,
        filing_status: FilingStatus,
        wages: Decimal,
    ) -> Self {
        Self {
            state: state.into(),
            filing_status,
            age_65_or_older: false,
            wages,
            dividends: Decimal::ZERO,
            interest: Decimal::ZERO,
            short_term_capital_gains: Decimal::ZERO,
            long_term_capital_gains: Decimal::ZERO,
            itemized_deductions: BTreeMap::new(),
            credits: BTreeMap::new(),
        }
    }

    pub fn with_deduction(
        mut self,
        kind: UsaDeduction,
        amount: Decimal,
    ) -> Self {
        self.itemized_deductions.insert(kind, amount);
        self
    }

    pub fn with_credit(
        mut self,
        kind: UsaCredit,
        amount: Decimal,
    ) -> Self {
        self.credits.insert(kind, amount);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsaCreditCaps {
    #[serde(default)]
    pub child_tax: Option<Decimal>,
    #[serde(default)]
    pub dependent_care: Option<Decimal>,
    #[serde(default)]
    pub education: Option<Decimal>,
    #[serde(default)]
    pub energy: Option<Decimal>,
}

impl UsaCreditCaps {
    pub fn cap_for(
        &self,
        kind: UsaCredit,
    ) -> Option<Decimal> {
        match kind {
            UsaCredit::ChildTax => self.child_tax,
            UsaCredit::DependentCare => self.dependent_care,
            UsaCredit::Education => self.education,
            UsaCredit::Energy => self.energy,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsaProfile {
    pub tax_year: i32,
    pub federal: FilingStatusTable<Vec<TaxBracket>>,
    pub standard_deduction: FilingStatusTable<Decimal>,
    /// Added to the standard deduction at 65 or older.
    pub additional_standard_deduction: FilingStatusTable<Decimal>,
    /// 0% / 15% / 20% schedule, keyed off taxable income.
    pub long_term_capital_gains: FilingStatusTable<Vec<TaxBracket>>,
    /// Keyed by two-letter state code.
    pub state: BTreeMap<String, Vec<TaxBracket>>,
    pub salt_cap: FilingStatusTable<Decimal>,
    /// Medical expenses are deductible above this fraction of total income.
    pub medical_expense_floor_rate: Decimal,
    #[serde(default)]
    pub credit_caps: UsaCreditCaps,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsaTaxBreakdown {
    pub filing_status: FilingStatus,
    /// Wages, dividends, interest and short-term gains.
    pub ordinary_income: Decimal,
    pub standard_deduction: Decimal,
    pub itemized_deductions: Decimal,
    pub used_itemized_deduction: bool,
    pub federal_tax: Decimal,
    pub state_tax: Decimal,
    pub long_term_capital_gains_tax: Decimal,
    /// Credits actually applied; never more than the tax they offset.
    pub credits: Decimal,
}
