//! Plain-text rendering of results.

use std::fmt::Write;

use fincalc_core::calculations::BracketSlice;
use fincalc_core::{Country, InvestmentResult, ProjectionYear, TaxBreakdown, TaxComputationResult};
use rust_decimal::{Decimal, RoundingStrategy};

/// The main bracket schedule applied to a result's taxable income.
#[derive(Debug, Clone)]
pub struct ScheduleView {
    pub label: String,
    pub slices: Vec<BracketSlice>,
    pub marginal_rate: Option<Decimal>,
    /// Number of brackets in the full schedule.
    pub bracket_count: usize,
}

/// Formats an amount with thousands separators and two decimals.
pub fn money(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}{grouped}.{cents}")
}

/// A fractional rate as a percentage, e.g. `0.205` as `20.5%`.
pub fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * Decimal::ONE_HUNDRED).normalize())
}

fn line(
    out: &mut String,
    label: &str,
    amount: Decimal,
) {
    let _ = writeln!(out, "  {label:<28}{:>18}", money(amount));
}

fn title(result: &TaxComputationResult) -> String {
    let region = result.region.as_deref().map(|r| format!(" ({r})")).unwrap_or_default();
    match &result.breakdown {
        TaxBreakdown::India(b) => {
            format!("{} income tax, {} regime", Country::India, b.regime.as_str())
        }
        TaxBreakdown::Canada(_) => format!("{} income tax{region}", Country::Canada),
        TaxBreakdown::UnitedStates(b) => format!(
            "{} income tax{region}, filing {}",
            Country::UnitedStates,
            b.filing_status.label()
        ),
    }
}

pub fn render_tax(
    result: &TaxComputationResult,
    schedule: Option<&ScheduleView>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", title(result));
    if result.gross_income != result.total_income {
        line(&mut out, "Income received", result.gross_income);
    }
    line(&mut out, "Total income", result.total_income);
    line(&mut out, "Deductions", result.deductions);
    line(&mut out, "Taxable income", result.taxable_income);
    let _ = writeln!(out);

    match &result.breakdown {
        TaxBreakdown::India(b) => {
            line(&mut out, "Standard deduction", b.standard_deduction);
            line(&mut out, "Claimed deductions", b.claimed_deductions);
            line(&mut out, "Slab tax", b.slab_tax);
            line(&mut out, "Rebate (87A)", b.rebate);
            line(&mut out, "Surcharge", b.surcharge);
            line(&mut out, "Health & education cess", b.cess);
            line(&mut out, "Capital gains tax", b.capital_gains_tax);
        }
        TaxBreakdown::Canada(b) => {
            line(&mut out, "RRSP deduction", b.rrsp_deduction);
            line(&mut out, "Itemized deductions", b.itemized_deductions);
            line(&mut out, "Federal tax", b.federal_tax);
            line(&mut out, "Provincial tax", b.provincial_tax);
            line(&mut out, "CPP contribution", b.cpp_contribution);
            line(&mut out, "EI premium", b.ei_premium);
        }
        TaxBreakdown::UnitedStates(b) => {
            let chosen = if b.used_itemized_deduction { "itemized" } else { "standard" };
            line(&mut out, "Ordinary income", b.ordinary_income);
            line(&mut out, "Standard deduction", b.standard_deduction);
            line(&mut out, "Itemized deductions", b.itemized_deductions);
            let _ = writeln!(out, "  {:<28}{chosen:>18}", "Deduction used");
            line(&mut out, "Federal tax", b.federal_tax);
            line(&mut out, "State tax", b.state_tax);
            line(&mut out, "Long-term capital gains tax", b.long_term_capital_gains_tax);
            line(&mut out, "Credits", b.credits);
        }
    }

    let _ = writeln!(out);
    line(&mut out, "Total tax", result.total_tax);
    line(&mut out, "Net income", result.net_income);
    let _ = writeln!(out, "  {:<28}{:>17}%", "Effective rate", result.effective_rate);

    if let Some(schedule) = schedule {
        let _ = writeln!(out);
        out.push_str(&render_schedule(schedule));
    }

    out
}

fn render_schedule(schedule: &ScheduleView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Brackets applied ({})", schedule.label);

    if schedule.slices.is_empty() {
        let _ = writeln!(out, "  no taxable income");
    }

    let last = schedule.bracket_count.saturating_sub(1);
    for (index, slice) in schedule.slices.iter().enumerate() {
        let bracket = &slice.bracket;
        let range = match bracket.max_income {
            Some(max) if index < last => format!("{} - {}", money(bracket.min_income), money(max)),
            _ => format!("{} and above", money(bracket.min_income)),
        };
        let _ = writeln!(
            out,
            "  {range:<34}{:>8}{:>18}{:>16}",
            percent(bracket.tax_rate),
            money(slice.taxed_amount),
            money(slice.tax)
        );
    }

    if let Some(rate) = schedule.marginal_rate {
        let _ = writeln!(out, "  Marginal rate: {}", percent(rate));
    }
    out
}

pub fn render_projection(
    result: &InvestmentResult,
    timeline: Option<&[ProjectionYear]>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Investment projection");
    line(&mut out, "Total invested", result.total_invested);
    line(&mut out, "Total withdrawn", result.total_withdrawn);
    line(&mut out, "Total returns", result.total_returns);
    line(&mut out, "Final balance", result.final_balance);
    line(&mut out, "Total value", result.total_value);

    if let Some(rows) = timeline {
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "  {:>4}{:>18}{:>18}{:>20}",
            "Year", "Contributed", "Withdrawn", "Closing balance"
        );
        for row in rows {
            let _ = writeln!(
                out,
                "  {:>4}{:>18}{:>18}{:>20}",
                row.year,
                money(row.contributed),
                money(row.withdrawn),
                money(row.closing_balance)
            );
        }
    }

    out
}

pub fn render_regions(
    country: Country,
    regions: &[String],
) -> String {
    if regions.is_empty() {
        return format!("{country}: no regional schedules\n");
    }
    format!("{country}: {}\n", regions.join(", "))
}
