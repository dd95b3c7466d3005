//! Loads tax tables and runs a parsed command.

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result, bail};
use fincalc_core::calculations::{BracketTaxEngine, with_basic_exemption};
use fincalc_core::{
    TaxCalculator, TaxComputationInput, TaxRegime, TaxTableRepository, TaxTables,
    projection_timeline, try_project_investment,
};
use fincalc_data::{BracketCsvLoader, default_registry};
use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::cli::{Cli, Command, SourceArgs};
use crate::report::{ScheduleView, render_projection, render_regions, render_tax};

/// Opens the configured table source and applies any CSV bracket overrides.
pub async fn load_tables(source: &SourceArgs) -> Result<TaxTables> {
    let config = source.config();
    debug!(backend = %config.backend, "opening tax table source");

    let repo = default_registry()
        .create(&config)
        .await
        .with_context(|| format!("Failed to open tax table source '{}'", config.backend))?;
    let mut tables = repo.load_tables().await.context("Failed to load tax tables")?;

    if let Some(path) = &source.brackets {
        apply_overrides(&mut tables, path)?;
    }
    Ok(tables)
}

fn apply_overrides(
    tables: &mut TaxTables,
    path: &Path,
) -> Result<()> {
    let file = File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;
    let records = BracketCsvLoader::parse(file)
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
    let replaced = BracketCsvLoader::apply(tables, &records)
        .with_context(|| format!("Failed to apply bracket overrides from {}", path.display()))?;
    info!(path = %path.display(), replaced, "applied bracket overrides");
    Ok(())
}

/// The primary progressive schedule for `input`, split at `taxable_income`.
pub fn main_schedule(
    tables: &TaxTables,
    input: &TaxComputationInput,
    taxable_income: Decimal,
) -> Option<ScheduleView> {
    let (label, brackets) = match input {
        TaxComputationInput::India(input) => {
            let profile = tables.india.as_ref()?;
            let rules = profile.regime(input.regime);
            match input.regime {
                TaxRegime::Old => (
                    "IN:old".to_string(),
                    with_basic_exemption(&rules.brackets, profile.basic_exemption.for_age(input.age)),
                ),
                TaxRegime::New => ("IN:new".to_string(), rules.brackets.clone()),
            }
        }
        TaxComputationInput::Canada(_) => {
            ("CA:federal".to_string(), tables.canada.as_ref()?.federal.clone())
        }
        TaxComputationInput::UnitedStates(input) => (
            format!("US:federal:{}", input.filing_status.as_str()),
            tables.usa.as_ref()?.federal.get(input.filing_status).clone(),
        ),
    };

    let engine = BracketTaxEngine::new(&brackets);
    Some(ScheduleView {
        label,
        slices: engine.breakdown(taxable_income),
        marginal_rate: engine.marginal_rate(taxable_income),
        bracket_count: brackets.len(),
    })
}

/// Runs `cli` and returns the text to print.
pub async fn run(cli: &Cli) -> Result<String> {
    match &cli.command {
        Command::Tax { country } => {
            let tables = load_tables(&cli.source).await?;
            let input = country.to_input();
            let result = TaxCalculator::new(&tables)
                .try_calculate(&input)
                .with_context(|| format!("Cannot compute {} tax", input.country()))?;
            info!(
                country = input.country().as_str(),
                total_tax = %result.total_tax,
                "tax computed"
            );

            let schedule = main_schedule(&tables, &input, result.taxable_income);
            Ok(render_tax(&result, schedule.as_ref()))
        }
        Command::Project(args) => {
            let scenario = args.scenario();
            if scenario.horizon_years() == 0 {
                bail!("Nothing to project: set --years or a withdrawal period");
            }

            let result = try_project_investment(&scenario).context("Cannot project investment")?;
            let timeline = if args.timeline {
                Some(projection_timeline(&scenario).context("Cannot project investment")?)
            } else {
                None
            };
            Ok(render_projection(&result, timeline.as_deref()))
        }
        Command::Regions { country } => {
            let tables = load_tables(&cli.source).await?;
            if !tables.has_profile(*country) {
                bail!("The loaded tables have no {country} profile");
            }
            Ok(render_regions(*country, &tables.regions(*country)))
        }
    }
}
