//! Command-line definition and value parsers.

use std::path::PathBuf;
use std::str::FromStr;

use clap::{Args, Parser, Subcommand};
use fincalc_core::tables::TableSourceConfig;
use fincalc_core::{
    AgeBracket, CanadaDeduction, CanadaTaxInput, Country, DeductionMethod, FilingStatus,
    IndiaDeduction, IndiaTaxInput, InvestmentScenario, MAX_HORIZON_YEARS, TaxComputationInput,
    TaxRegime, UsaCredit, UsaDeduction, UsaTaxInput,
};
use rust_decimal::Decimal;

const MAX_YEARS: i64 = MAX_HORIZON_YEARS as i64;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Personal-finance calculator: income tax for India, Canada and the USA,
/// and SIP/SWP investment projections.
#[derive(Debug, Parser)]
#[command(name = "fincalc", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Where tax tables come from.
#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    /// TOML tables file; the built-in tables are used when omitted.
    #[arg(long, global = true)]
    pub tables: Option<PathBuf>,

    /// CSV of replacement bracket schedules
    /// (country,schedule,min_income,max_income,rate).
    #[arg(long, global = true)]
    pub brackets: Option<PathBuf>,
}

impl SourceArgs {
    pub fn config(&self) -> TableSourceConfig {
        match &self.tables {
            Some(path) => TableSourceConfig::toml(path),
            None => TableSourceConfig::builtin(),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compute income tax for one jurisdiction.
    Tax {
        #[command(subcommand)]
        country: TaxCommand,
    },

    /// Project a monthly (SIP) or one-time investment, with optional
    /// monthly withdrawals (SWP).
    Project(ProjectArgs),

    /// List the regions (provinces or states) the loaded tables support.
    Regions {
        /// IN, CA or US (display names are accepted too)
        #[arg(value_parser = parse_country)]
        country: Country,
    },
}

#[derive(Debug, Subcommand)]
pub enum TaxCommand {
    India(IndiaArgs),
    Canada(CanadaArgs),
    Usa(UsaArgs),
}

impl TaxCommand {
    pub fn to_input(&self) -> TaxComputationInput {
        match self {
            Self::India(args) => TaxComputationInput::India(args.to_input()),
            Self::Canada(args) => TaxComputationInput::Canada(args.to_input()),
            Self::Usa(args) => TaxComputationInput::UnitedStates(args.to_input()),
        }
    }
}

#[derive(Debug, Args)]
pub struct IndiaArgs {
    /// Gross annual income (salary or business)
    #[arg(long, value_parser = parse_amount)]
    pub income: Decimal,

    #[arg(long, default_value = "new", value_parser = parse_regime)]
    pub regime: TaxRegime,

    #[arg(long, default_value_t = 30)]
    pub age: u32,

    /// Income is not salary; no standard deduction applies.
    #[arg(long)]
    pub self_employed: bool,

    /// Old-regime deduction as KIND=AMOUNT (80c, 80ccd1b, 80d, 24b, 80e).
    #[arg(long = "deduction", value_parser = parse_india_deduction)]
    pub deductions: Vec<(IndiaDeduction, Decimal)>,

    /// Short-term capital gains
    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub stcg: Decimal,

    /// Long-term capital gains
    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub ltcg: Decimal,
}

impl IndiaArgs {
    pub fn to_input(&self) -> IndiaTaxInput {
        let mut input = IndiaTaxInput::new(self.income, self.regime);
        input.salaried = !self.self_employed;
        input.age = AgeBracket::from_age(self.age);
        input.short_term_capital_gains = self.stcg;
        input.long_term_capital_gains = self.ltcg;
        for (kind, amount) in &self.deductions {
            *input.deductions.entry(*kind).or_default() += *amount;
        }
        input
    }
}

#[derive(Debug, Args)]
pub struct CanadaArgs {
    /// Two-letter province or territory code, e.g. ON
    #[arg(long)]
    pub province: String,

    #[arg(long, value_parser = parse_amount)]
    pub employment_income: Decimal,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub self_employment_income: Decimal,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub other_income: Decimal,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub capital_gains: Decimal,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub eligible_dividends: Decimal,

    /// RRSP contribution for the year
    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub rrsp: Decimal,

    /// Itemized deduction as KIND=AMOUNT
    /// (child-care, union-dues, moving, support, other).
    #[arg(long = "deduction", value_parser = parse_canada_deduction)]
    pub deductions: Vec<(CanadaDeduction, Decimal)>,
}

impl CanadaArgs {
    pub fn to_input(&self) -> CanadaTaxInput {
        let mut input = CanadaTaxInput::new(&self.province, self.employment_income);
        input.self_employment_income = self.self_employment_income;
        input.other_income = self.other_income;
        input.capital_gains = self.capital_gains;
        input.eligible_dividends = self.eligible_dividends;
        input.rrsp_contribution = self.rrsp;
        if !self.deductions.is_empty() {
            input.deduction_method = DeductionMethod::Itemized;
        }
        for (kind, amount) in &self.deductions {
            *input.deductions.entry(*kind).or_default() += *amount;
        }
        input
    }
}

#[derive(Debug, Args)]
pub struct UsaArgs {
    /// Two-letter state code, e.g. CA
    #[arg(long)]
    pub state: String,

    /// single, mfj, mfs or hoh
    #[arg(long, default_value = "single", value_parser = parse_filing_status)]
    pub filing_status: FilingStatus,

    #[arg(long, value_parser = parse_amount)]
    pub wages: Decimal,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub dividends: Decimal,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub interest: Decimal,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub stcg: Decimal,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub ltcg: Decimal,

    #[arg(long)]
    pub age_65_or_older: bool,

    /// Itemized deduction as KIND=AMOUNT (salt, mortgage, charity, medical).
    #[arg(long = "deduction", value_parser = parse_usa_deduction)]
    pub deductions: Vec<(UsaDeduction, Decimal)>,

    /// Credit as KIND=AMOUNT (child, dependent-care, education, energy).
    #[arg(long = "credit", value_parser = parse_usa_credit)]
    pub credits: Vec<(UsaCredit, Decimal)>,
}

impl UsaArgs {
    pub fn to_input(&self) -> UsaTaxInput {
        let mut input = UsaTaxInput::new(&self.state, self.filing_status, self.wages);
        input.age_65_or_older = self.age_65_or_older;
        input.dividends = self.dividends;
        input.interest = self.interest;
        input.short_term_capital_gains = self.stcg;
        input.long_term_capital_gains = self.ltcg;
        for (kind, amount) in &self.deductions {
            *input.itemized_deductions.entry(*kind).or_default() += *amount;
        }
        for (kind, amount) in &self.credits {
            *input.credits.entry(*kind).or_default() += *amount;
        }
        input
    }
}

#[derive(Debug, Args)]
pub struct ProjectArgs {
    /// Amount invested at the start of every month
    #[arg(long, value_parser = parse_amount, required_unless_present = "lumpsum", conflicts_with = "lumpsum")]
    pub monthly: Option<Decimal>,

    /// One-time amount invested at the start
    #[arg(long, value_parser = parse_amount)]
    pub lumpsum: Option<Decimal>,

    /// Expected annual return in percent
    #[arg(long, value_parser = parse_amount)]
    pub rate: Decimal,

    /// Years of monthly contributions; for a lumpsum, the years to hold it
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=MAX_YEARS))]
    pub years: u32,

    /// Year after which monthly withdrawals begin
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=MAX_YEARS))]
    pub withdraw_after: u32,

    #[arg(long, default_value = "0", value_parser = parse_amount)]
    pub withdraw_monthly: Decimal,

    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=MAX_YEARS))]
    pub withdraw_years: u32,

    /// Print the year-by-year table.
    #[arg(long)]
    pub timeline: bool,
}

impl ProjectArgs {
    pub fn scenario(&self) -> InvestmentScenario {
        let base = match (self.monthly, self.lumpsum) {
            (Some(monthly), _) => InvestmentScenario::sip(monthly, self.rate, self.years),
            (None, lumpsum) => {
                let mut scenario =
                    InvestmentScenario::lumpsum(lumpsum.unwrap_or_default(), self.rate);
                scenario.contribution_years = self.years;
                scenario
            }
        };
        base.with_withdrawals(self.withdraw_after, self.withdraw_monthly, self.withdraw_years)
    }
}

// ─── value parsers ───────────────────────────────────────────────────────────

/// A non-negative decimal amount.
pub fn parse_amount(s: &str) -> Result<Decimal, String> {
    let value = Decimal::from_str(s.trim()).map_err(|e| format!("'{s}' is not a number: {e}"))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(format!("'{s}' must not be negative"));
    }
    Ok(value)
}

fn parse_country(s: &str) -> Result<Country, String> {
    Country::parse(s).ok_or_else(|| format!("unknown country '{s}'; expected IN, CA or US"))
}

fn parse_regime(s: &str) -> Result<TaxRegime, String> {
    TaxRegime::parse(s).ok_or_else(|| format!("unknown regime '{s}'; expected old or new"))
}

fn parse_filing_status(s: &str) -> Result<FilingStatus, String> {
    FilingStatus::parse(s)
        .ok_or_else(|| format!("unknown filing status '{s}'; expected single, mfj, mfs or hoh"))
}

/// Splits `KIND=AMOUNT`, resolving the kind with `parse_kind`.
fn parse_keyed_amount<K>(
    s: &str,
    parse_kind: impl Fn(&str) -> Option<K>,
    known: &[&str],
) -> Result<(K, Decimal), String> {
    let (kind, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("'{s}' should look like KIND=AMOUNT"))?;
    let kind = parse_kind(kind)
        .ok_or_else(|| format!("unknown kind '{kind}'; expected one of: {}", known.join(", ")))?;
    Ok((kind, parse_amount(amount)?))
}

pub fn parse_india_deduction(s: &str) -> Result<(IndiaDeduction, Decimal), String> {
    let known: Vec<_> = IndiaDeduction::all().iter().map(|k| k.as_str()).collect();
    parse_keyed_amount(s, IndiaDeduction::parse, &known)
}

pub fn parse_canada_deduction(s: &str) -> Result<(CanadaDeduction, Decimal), String> {
    let known: Vec<_> = CanadaDeduction::all().iter().map(|k| k.as_str()).collect();
    parse_keyed_amount(s, CanadaDeduction::parse, &known)
}

pub fn parse_usa_deduction(s: &str) -> Result<(UsaDeduction, Decimal), String> {
    let known: Vec<_> = UsaDeduction::all().iter().map(|k| k.as_str()).collect();
    parse_keyed_amount(s, UsaDeduction::parse, &known)
}

pub fn parse_usa_credit(s: &str) -> Result<(UsaCredit, Decimal), String> {
    let known: Vec<_> = UsaCredit::all().iter().map(|k| k.as_str()).collect();
    parse_keyed_amount(s, UsaCredit::parse, &known)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fincalc").chain(args.iter().copied())).unwrap()
    }

    // =========================================================================
    // value parsers
    // =========================================================================

    #[test]
    fn parse_amount_accepts_decimals() {
        assert_eq!(parse_amount("1250.50"), Ok(dec!(1250.50)));
        assert_eq!(parse_amount(" 0 "), Ok(dec!(0)));
    }

    #[test]
    fn parse_amount_rejects_negative_and_garbage() {
        assert!(parse_amount("-1").unwrap_err().contains("negative"));
        assert!(parse_amount("ten").unwrap_err().contains("not a number"));
    }

    #[test]
    fn keyed_amount_parsers() {
        assert_eq!(
            parse_india_deduction("80C=150000"),
            Ok((IndiaDeduction::Section80C, dec!(150000)))
        );
        assert_eq!(
            parse_usa_credit("dependent-care=1200"),
            Ok((UsaCredit::DependentCare, dec!(1200)))
        );
        assert!(parse_usa_deduction("salt").unwrap_err().contains("KIND=AMOUNT"));
        assert!(parse_canada_deduction("gym=100").unwrap_err().contains("child-care"));
        assert!(parse_canada_deduction("moving=-5").unwrap_err().contains("negative"));
    }

    // =========================================================================
    // argument mapping
    // =========================================================================

    #[test]
    fn india_args_map_to_input() {
        let cli = parse(&[
            "tax", "india", "--income", "1200000", "--regime", "old", "--age", "65",
            "--deduction", "80c=100000", "--deduction", "80c=80000", "--ltcg", "200000",
        ]);

        let Command::Tax { country: TaxCommand::India(args) } = cli.command else {
            panic!("expected tax india");
        };
        let input = args.to_input();

        assert_eq!(input.regime, TaxRegime::Old);
        assert_eq!(input.age, AgeBracket::Senior);
        assert!(input.salaried);
        assert_eq!(input.deductions[&IndiaDeduction::Section80C], dec!(180000));
        assert_eq!(input.long_term_capital_gains, dec!(200000));
    }

    #[test]
    fn canada_deductions_switch_to_itemized() {
        let cli = parse(&[
            "tax", "canada", "--province", "on", "--employment-income", "80000",
            "--deduction", "union-dues=900",
        ]);

        let Command::Tax { country: TaxCommand::Canada(args) } = cli.command else {
            panic!("expected tax canada");
        };
        let input = args.to_input();

        assert_eq!(input.province, "on");
        assert_eq!(input.deduction_method, DeductionMethod::Itemized);
        assert_eq!(input.deductions[&CanadaDeduction::UnionDues], dec!(900));
    }

    #[test]
    fn usa_defaults_to_single() {
        let cli = parse(&["tax", "usa", "--state", "TX", "--wages", "60000"]);

        let Command::Tax { country } = cli.command else {
            panic!("expected tax usa");
        };
        let TaxComputationInput::UnitedStates(input) = country.to_input() else {
            panic!("expected a USA input");
        };

        assert_eq!(input.filing_status, FilingStatus::Single);
        assert_eq!(input.wages, dec!(60000));
        assert!(input.credits.is_empty());
    }

    #[test]
    fn project_requires_exactly_one_contribution_kind() {
        assert!(Cli::try_parse_from(["fincalc", "project", "--rate", "12"]).is_err());
        assert!(
            Cli::try_parse_from([
                "fincalc", "project", "--monthly", "5000", "--lumpsum", "1000", "--rate", "12",
            ])
            .is_err()
        );
    }

    #[test]
    fn project_args_build_scenario() {
        let cli = parse(&[
            "project", "--monthly", "10000", "--rate", "12", "--years", "10",
            "--withdraw-after", "10", "--withdraw-monthly", "20000", "--withdraw-years", "5",
        ]);

        let Command::Project(args) = cli.command else {
            panic!("expected project");
        };

        assert_eq!(
            args.scenario(),
            InvestmentScenario::sip(dec!(10000), dec!(12), 10).with_withdrawals(10, dec!(20000), 5)
        );
    }

    #[test]
    fn tables_flag_selects_toml_backend() {
        let cli = parse(&["--tables", "rates.toml", "regions", "CA"]);

        assert_eq!(cli.source.config(), TableSourceConfig::toml("rates.toml"));
        assert!(matches!(cli.command, Command::Regions { country: Country::Canada }));
        assert_eq!(SourceArgs::default().config(), TableSourceConfig::builtin());
    }
}
