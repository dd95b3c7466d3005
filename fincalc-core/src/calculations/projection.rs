//! Month-by-month SIP / lumpsum projection with systematic withdrawals.
//!
//! Each simulated month applies, in order:
//!
//! 1. the monthly contribution, while inside the contribution period;
//! 2. compounding at `annual_return_rate / 12 / 100`;
//! 3. the monthly withdrawal, while inside the withdrawal window.
//!
//! Balances are carried unrounded and only rounded to whole currency units
//! when reported. A balance may go negative if withdrawals outrun the
//! portfolio; that is reported as-is.
//!
//! Horizons beyond [`MAX_HORIZON_YEARS`] and balances that leave the
//! `Decimal` range yield no result.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::InvestmentScenario;
//! use fincalc_core::calculations::project_investment;
//!
//! let mut scenario = InvestmentScenario::lumpsum(dec!(100000), dec!(12));
//! scenario.contribution_years = 1;
//!
//! let result = project_investment(&scenario).unwrap();
//!
//! assert_eq!(result.final_balance, dec!(112683));
//! assert_eq!(result.yearly_balances, vec![dec!(100000), dec!(112683)]);
//! ```

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::calculations::common::round_whole;
use crate::calculations::error::ProjectionError;
use crate::models::{
    ContributionPlan, InvestmentResult, InvestmentScenario, MAX_HORIZON_YEARS, ProjectionYear,
};

const MONTHS_PER_YEAR: u32 = 12;

/// Unrounded running totals of a simulation.
#[derive(Debug, Default)]
struct Simulation {
    opening_balance: Decimal,
    balance: Decimal,
    total_invested: Decimal,
    total_withdrawn: Decimal,
    years: Vec<ProjectionYear>,
}

fn monthly_rate(annual_return_rate: Decimal) -> Decimal {
    annual_return_rate / Decimal::from(MONTHS_PER_YEAR) / Decimal::ONE_HUNDRED
}

fn months(years: u32) -> u32 {
    years.saturating_mul(MONTHS_PER_YEAR)
}

fn simulate(scenario: &InvestmentScenario) -> Result<Simulation, ProjectionError> {
    let horizon = scenario.horizon_years();
    if horizon > MAX_HORIZON_YEARS {
        return Err(ProjectionError::HorizonTooLong {
            years: horizon,
            max: MAX_HORIZON_YEARS,
        });
    }

    let growth = Decimal::ONE + monthly_rate(scenario.annual_return_rate);
    let total_months = months(horizon);
    let contribution_months = months(scenario.contribution_years);
    let withdrawal_start = months(scenario.withdrawal_start_year);
    let withdrawal_end = withdrawal_start.saturating_add(months(scenario.withdrawal_years));

    let (opening_balance, monthly_contribution) = match scenario.contribution {
        ContributionPlan::Lumpsum(amount) => (amount, Decimal::ZERO),
        ContributionPlan::Monthly(amount) => (Decimal::ZERO, amount),
    };

    let mut sim = Simulation {
        opening_balance,
        balance: opening_balance,
        total_invested: opening_balance,
        ..Default::default()
    };
    let mut year_contributed = Decimal::ZERO;
    let mut year_withdrawn = Decimal::ZERO;

    for month in 1..=total_months {
        let overflow = || ProjectionError::Overflow { month };

        if month <= contribution_months {
            sim.balance = sim
                .balance
                .checked_add(monthly_contribution)
                .ok_or_else(overflow)?;
            sim.total_invested = sim
                .total_invested
                .checked_add(monthly_contribution)
                .ok_or_else(overflow)?;
            year_contributed += monthly_contribution;
        }

        sim.balance = sim.balance.checked_mul(growth).ok_or_else(overflow)?;

        if month > withdrawal_start && month <= withdrawal_end {
            sim.balance = sim
                .balance
                .checked_sub(scenario.monthly_withdrawal)
                .ok_or_else(overflow)?;
            sim.total_withdrawn = sim
                .total_withdrawn
                .checked_add(scenario.monthly_withdrawal)
                .ok_or_else(overflow)?;
            year_withdrawn += scenario.monthly_withdrawal;
        }

        if month % MONTHS_PER_YEAR == 0 {
            sim.years.push(ProjectionYear {
                year: month / MONTHS_PER_YEAR,
                contributed: round_whole(year_contributed),
                withdrawn: round_whole(year_withdrawn),
                closing_balance: round_whole(sim.balance),
            });
            year_contributed = Decimal::ZERO;
            year_withdrawn = Decimal::ZERO;
        }
    }

    Ok(sim)
}

/// Runs the projection and summarizes it in whole currency units.
pub fn try_project_investment(
    scenario: &InvestmentScenario,
) -> Result<InvestmentResult, ProjectionError> {
    let sim = simulate(scenario)?;
    let last_month = months(scenario.horizon_years());
    let overflow = || ProjectionError::Overflow { month: last_month };

    let total_invested = round_whole(sim.total_invested);
    let total_withdrawn = round_whole(sim.total_withdrawn);
    let final_balance = round_whole(sim.balance);
    let total_value = final_balance.checked_add(total_withdrawn).ok_or_else(overflow)?;
    let total_returns = total_value.checked_sub(total_invested).ok_or_else(overflow)?;

    let mut yearly_balances = Vec::with_capacity(sim.years.len() + 1);
    yearly_balances.push(round_whole(sim.opening_balance));
    yearly_balances.extend(sim.years.iter().map(|year| year.closing_balance));

    debug!(
        months = sim.years.len() * MONTHS_PER_YEAR as usize,
        %total_invested,
        %total_withdrawn,
        %final_balance,
        "projected investment"
    );

    Ok(InvestmentResult {
        total_invested,
        total_withdrawn,
        total_returns,
        final_balance,
        total_value,
        yearly_balances,
    })
}

/// Runs the projection, or `None` when it cannot be represented.
pub fn project_investment(scenario: &InvestmentScenario) -> Option<InvestmentResult> {
    match try_project_investment(scenario) {
        Ok(result) => Some(result),
        Err(error) => {
            warn!(
                horizon_years = scenario.horizon_years(),
                rate = %scenario.annual_return_rate,
                %error,
                "projection produced no result"
            );
            None
        }
    }
}

/// Year-by-year rows of the same projection, for tabular display.
pub fn projection_timeline(
    scenario: &InvestmentScenario,
) -> Result<Vec<ProjectionYear>, ProjectionError> {
    simulate(scenario).map(|sim| sim.years)
}
