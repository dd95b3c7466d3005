use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Longest horizon a projection will simulate.
pub const MAX_HORIZON_YEARS: u32 = 100;

/// How money goes into the portfolio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContributionPlan {
    /// Systematic investment: this amount at the start of every month of the
    /// contribution period.
    Monthly(Decimal),
    /// One-time deposit at month zero; no further contributions.
    Lumpsum(Decimal),
}

/// Inputs to a month-by-month SIP/SWP projection.
///
/// All amounts, rates and periods are expected to be non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentScenario {
    pub contribution: ContributionPlan,
    /// Expected annual return in percent, e.g. `12` for 12% p.a.
    pub annual_return_rate: Decimal,
    pub contribution_years: u32,
    /// Years from the start after which withdrawals begin.
    pub withdrawal_start_year: u32,
    pub monthly_withdrawal: Decimal,
    pub withdrawal_years: u32,
}

impl InvestmentScenario {
    pub fn sip(
        monthly_investment: Decimal,
        annual_return_rate: Decimal,
        contribution_years: u32,
    ) -> Self {
        Self {
            contribution: ContributionPlan::Monthly(monthly_investment),
            annual_return_rate,
            contribution_years,
            withdrawal_start_year: 0,
            monthly_withdrawal: Decimal::ZERO,
            withdrawal_years: 0,
        }
    }

    pub fn lumpsum(
        amount: Decimal,
        annual_return_rate: Decimal,
    ) -> Self {
        Self {
            contribution: ContributionPlan::Lumpsum(amount),
            annual_return_rate,
            contribution_years: 0,
            withdrawal_start_year: 0,
            monthly_withdrawal: Decimal::ZERO,
            withdrawal_years: 0,
        }
    }

    pub fn with_withdrawals(
        mut self,
        start_year: u32,
        monthly_amount: Decimal,
        years: u32,
    ) -> Self {
        self.withdrawal_start_year = start_year;
        self.monthly_withdrawal = monthly_amount;
        self.withdrawal_years = years;
        self
    }

    /// Length of the simulation in years, saturating at `u32::MAX`.
    pub fn horizon_years(&self) -> u32 {
        self.contribution_years
            .max(self.withdrawal_start_year.saturating_add(self.withdrawal_years))
    }
}

/// Summary of a projection, rounded to whole currency units.
///
/// `total_returns == final_balance + total_withdrawn - total_invested` holds
/// exactly on the rounded figures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentResult {
    pub total_invested: Decimal,
    pub total_withdrawn: Decimal,
    pub total_returns: Decimal,
    pub final_balance: Decimal,
    /// `final_balance + total_withdrawn`.
    pub total_value: Decimal,
    /// Opening balance, then the balance after each completed year.
    pub yearly_balances: Vec<Decimal>,
}

/// One row of the year-by-year projection table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectionYear {
    /// 1-based year number.
    pub year: u32,
    pub contributed: Decimal,
    pub withdrawn: Decimal,
    pub closing_balance: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn horizon_covers_contributions_and_withdrawals() {
        let scenario = InvestmentScenario::sip(dec!(1000), dec!(10), 10).with_withdrawals(8, dec!(500), 5);

        assert_eq!(scenario.horizon_years(), 13);
        assert_eq!(InvestmentScenario::lumpsum(dec!(1000), dec!(10)).horizon_years(), 0);
    }

    #[test]
    fn horizon_saturates_instead_of_overflowing() {
        let scenario = InvestmentScenario::sip(dec!(1000), dec!(10), 5).with_withdrawals(u32::MAX, dec!(0), 1);

        assert_eq!(scenario.horizon_years(), u32::MAX);
    }
}
