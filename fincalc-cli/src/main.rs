use clap::Parser;
use fincalc_cli::cli::Cli;
use fincalc_cli::{app, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_file.as_deref())?;

    let output = app::run(&cli).await?;
    print!("{output}");

    Ok(())
}
