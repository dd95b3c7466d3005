use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fincalc_core::{Country, TaxTableRepository};
use fincalc_core::tables::TableSourceConfig;
use fincalc_data::{BracketCsvLoader, default_registry, render_tables};
use tracing_subscriber::EnvFilter;

/// Inspect and export tax tables.
#[derive(Parser, Debug)]
#[command(name = "fincalc-tables")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write tables as TOML, optionally with CSV bracket overrides applied.
    ///
    /// The CSV file should have the columns
    /// country,schedule,min_income,max_income,rate
    /// with an empty max_income for the open-ended top bracket.
    Export {
        /// Start from this TOML file instead of the built-in tables
        #[arg(short, long)]
        from: Option<PathBuf>,

        /// CSV file of replacement bracket schedules
        #[arg(short, long)]
        brackets: Option<PathBuf>,

        /// Output path; stdout when omitted
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Validate a TOML tables file and list the regions it covers.
    Check {
        file: PathBuf,
    },
}

fn source(from: Option<PathBuf>) -> TableSourceConfig {
    match from {
        Some(path) => TableSourceConfig::toml(path),
        None => TableSourceConfig::builtin(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let registry = default_registry();

    match args.command {
        Command::Export { from, brackets, out } => {
            let config = source(from);
            let repo = registry
                .create(&config)
                .await
                .with_context(|| format!("Failed to open table source: {config:?}"))?;
            let mut tables = repo.load_tables().await.context("Failed to load tax tables")?;

            if let Some(path) = &brackets {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open: {}", path.display()))?;
                let records = BracketCsvLoader::parse(file)
                    .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;
                let replaced = BracketCsvLoader::apply(&mut tables, &records)
                    .context("Failed to apply bracket overrides")?;
                eprintln!("Replaced {} schedules from {}", replaced, path.display());
            }

            let rendered = render_tables(&tables).context("Failed to render tax tables")?;
            match out {
                Some(path) => {
                    std::fs::write(&path, rendered)
                        .with_context(|| format!("Failed to write: {}", path.display()))?;
                    eprintln!("Wrote tax tables to {}", path.display());
                }
                None => print!("{rendered}"),
            }
        }
        Command::Check { file } => {
            let config = TableSourceConfig::toml(&file);
            let repo = registry
                .create(&config)
                .await
                .with_context(|| format!("Failed to open: {}", file.display()))?;
            let tables = repo
                .load_tables()
                .await
                .with_context(|| format!("Invalid tax tables: {}", file.display()))?;

            for country in Country::all() {
                if !tables.has_profile(*country) {
                    println!("{country}: not present");
                    continue;
                }
                let regions = tables.regions(*country);
                if regions.is_empty() {
                    println!("{country}: ok");
                } else {
                    println!("{country}: ok ({})", regions.join(", "));
                }
            }
        }
    }

    Ok(())
}
