use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TaxBracket;

/// Which of the two parallel slab systems the taxpayer opts into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    Old,
    New,
}

impl TaxRegime {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" => Some(Self::Old),
            "new" => Some(Self::New),
            _ => None,
        }
    }
}

/// Age tier; shifts the old-regime basic exemption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBracket {
    BelowSixty,
    Senior,
    SuperSenior,
}

impl AgeBracket {
    pub fn from_age(age: u32) -> Self {
        match age {
            0..60 => Self::BelowSixty,
            60..80 => Self::Senior,
            _ => Self::SuperSenior,
        }
    }

    pub fn is_senior(&self) -> bool {
        !matches!(self, Self::BelowSixty)
    }
}

/// Old-regime deductions claimable against gross income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndiaDeduction {
    /// PPF, ELSS, life insurance premiums (Section 80C).
    Section80C,
    /// Additional NPS contribution (Section 80CCD(1B)).
    Nps80Ccd1b,
    /// Health insurance premium (Section 80D).
    HealthInsurance80D,
    /// Interest on a self-occupied home loan (Section 24(b)).
    HomeLoanInterest24b,
    /// Interest on an education loan (Section 80E).
    EducationLoan80E,
}

impl IndiaDeduction {
    pub fn all() -> &'static [IndiaDeduction] {
        &[
            IndiaDeduction::Section80C,
            IndiaDeduction::Nps80Ccd1b,
            IndiaDeduction::HealthInsurance80D,
            IndiaDeduction::HomeLoanInterest24b,
            IndiaDeduction::EducationLoan80E,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Section80C => "80c",
            Self::Nps80Ccd1b => "80ccd1b",
            Self::HealthInsurance80D => "80d",
            Self::HomeLoanInterest24b => "24b",
            Self::EducationLoan80E => "80e",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "80c" => Some(Self::Section80C),
            "80ccd1b" | "nps" => Some(Self::Nps80Ccd1b),
            "80d" | "health" => Some(Self::HealthInsurance80D),
            "24b" | "home-loan" => Some(Self::HomeLoanInterest24b),
            "80e" | "education-loan" => Some(Self::EducationLoan80E),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndiaTaxInput {
    pub gross_income: Decimal,
    /// The standard deduction only applies to salary or pension income.
    pub salaried: bool,
    pub regime: TaxRegime,
    pub age: AgeBracket,
    #[serde(default)]
    pub deductions: BTreeMap<IndiaDeduction, Decimal>,
    #[serde(default)]
    pub short_term_capital_gains: Decimal,
    #[serde(default)]
    pub long_term_capital_gains: Decimal,
}

impl IndiaTaxInput {
    /// A salaried taxpayer below sixty with no deductions or gains.
    pub fn new(
        gross_income: Decimal,
        regime: TaxRegime,
    ) -> Self {
        Self {
            gross_income,
            salaried: true,
            regime,
            age: AgeBracket::BelowSixty,
            deductions: BTreeMap::new(),
            short_term_capital_gains: Decimal::ZERO,
            long_term_capital_gains: Decimal::ZERO,
        }
    }

    pub fn with_deduction(
        mut self,
        kind: IndiaDeduction,
        amount: Decimal,
    ) -> Self {
        self.deductions.insert(kind, amount);
        self
    }
}

/// Surcharge rate applied when taxable income exceeds `threshold`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurchargeTier {
    pub threshold: Decimal,
    pub rate: Decimal,
}

/// Rules that differ between the old and new regimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeRules {
    pub brackets: Vec<TaxBracket>,
    /// Flat deduction from salary income.
    pub standard_deduction: Decimal,
    /// Section 87A: slab tax is zero at or below this taxable income.
    pub rebate_threshold: Decimal,
    /// Ascending by threshold.
    pub surcharge_tiers: Vec<SurchargeTier>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicExemptions {
    pub below_sixty: Decimal,
    pub senior: Decimal,
    pub super_senior: Decimal,
}

impl BasicExemptions {
    pub fn for_age(
        &self,
        age: AgeBracket,
    ) -> Decimal {
        match age {
            AgeBracket::BelowSixty => self.below_sixty,
            AgeBracket::Senior => self.senior,
            AgeBracket::SuperSenior => self.super_senior,
        }
    }
}

/// Per-deduction ceilings; `None` means uncapped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndiaDeductionCaps {
    pub section_80c: Option<Decimal>,
    pub nps_80ccd_1b: Option<Decimal>,
    pub health_insurance_80d: Option<Decimal>,
    pub health_insurance_80d_senior: Option<Decimal>,
    pub home_loan_interest_24b: Option<Decimal>,
    pub education_loan_80e: Option<Decimal>,
}

impl IndiaDeductionCaps {
    pub fn cap_for(
        &self,
        kind: IndiaDeduction,
        age: AgeBracket,
    ) -> Option<Decimal> {
        match kind {
            IndiaDeduction::Section80C => self.section_80c,
            IndiaDeduction::Nps80Ccd1b => self.nps_80ccd_1b,
            IndiaDeduction::HealthInsurance80D if age.is_senior() => {
                self.health_insurance_80d_senior
            }
            IndiaDeduction::HealthInsurance80D => self.health_insurance_80d,
            IndiaDeduction::HomeLoanInterest24b => self.home_loan_interest_24b,
            IndiaDeduction::EducationLoan80E => self.education_loan_80e,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndiaProfile {
    /// Financial year label, e.g. `FY2024-25`.
    pub tax_year: String,
    pub old_regime: RegimeRules,
    pub new_regime: RegimeRules,
    /// Old-regime zero-rate threshold per age tier.
    pub basic_exemption: BasicExemptions,
    pub deduction_caps: IndiaDeductionCaps,
    pub cess_rate: Decimal,
    pub short_term_capital_gains_rate: Decimal,
    pub long_term_capital_gains_rate: Decimal,
    pub long_term_capital_gains_exemption: Decimal,
}

impl IndiaProfile {
    pub fn regime(
        &self,
        regime: TaxRegime,
    ) -> &RegimeRules {
        match regime {
            TaxRegime::Old => &self.old_regime,
            TaxRegime::New => &self.new_regime,
        }
    }
}

/// India's itemized components, unrounded until the result boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndiaTaxBreakdown {
    pub regime: TaxRegime,
    pub standard_deduction: Decimal,
    /// Sum of the capped chapter VI-A style deductions (old regime only).
    pub claimed_deductions: Decimal,
    pub slab_tax: Decimal,
    pub rebate: Decimal,
    pub surcharge: Decimal,
    pub cess: Decimal,
    pub capital_gains_tax: Decimal,
}
