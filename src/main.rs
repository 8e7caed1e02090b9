use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use lineage_core::api::{FamilyRequest, encode, load_family};
use lineage_core::config::{LineageConfig, OutputFormat};
use lineage_core::source::{DirectorySource, RowSource};

/// Compute generation levels and the union graph for a family sheet.
#[derive(Debug, Parser)]
#[command(name = "lineage", version)]
struct Cli {
    /// Directory of `<sheet>.toon` / `<sheet>.json` files (overrides LINEAGE_DATA_DIR).
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Sheet to load; defaults to LINEAGE_DEFAULT_SHEET.
    #[arg(long)]
    sheet: Option<String>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Only print the available sheet names.
    #[arg(long)]
    list: bool,
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = LineageConfig::from_env().context("reading LINEAGE_* environment")?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    let source = DirectorySource::new(&config.data_dir);

    if cli.list {
        let sheets = source
            .sheet_names()
            .with_context(|| format!("listing sheets in {}", config.data_dir.display()))?;
        println!("{}", encode(&sheets, config.format)?);
        return Ok(());
    }

    let request = FamilyRequest { sheet: cli.sheet };
    let response = load_family(&source, &request, &config).context("computing family tree")?;
    println!("{}", encode(&response, config.format)?);
    Ok(())
}
