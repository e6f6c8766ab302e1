use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, Level};

use stock_rankings::dedup::dedupe_latest;
use stock_rankings::export::generate_csv;
use stock_rankings::models::{parse_rankings, Config};
use stock_rankings::scoring::StrategySelection;

/// Export stock ranking snapshots to CSV.
#[derive(Debug, Parser)]
#[command(name = "export_rankings")]
struct Args {
    /// Rankings JSON file: the backend response envelope or a bare array
    #[arg(short, long)]
    input: PathBuf,

    /// Write the CSV here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit per-date score columns for these YYYYMMDD dates, in the given order
    #[arg(short, long, value_delimiter = ',')]
    dates: Vec<String>,

    /// Strategy key used to resolve composite scores
    #[arg(short, long)]
    strategy: Option<String>,

    /// Per-stock strategy override (repeatable)
    #[arg(long = "override", value_name = "SYMBOL=STRATEGY")]
    overrides: Vec<String>,

    /// Collapse duplicate symbols to their most recent record first
    #[arg(long)]
    dedupe: bool,
}

fn main() -> Result<()> {
    // Initialize logging; keep stdout clean for the CSV itself
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    let args = Args::parse();
    let config = Config::from_env();

    let payload = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read rankings file {}", args.input.display()))?;
    let mut stocks = parse_rankings(&payload)
        .with_context(|| format!("Failed to parse rankings JSON in {}", args.input.display()))?;
    info!("📈 Loaded {} ranking records", stocks.len());

    if args.dedupe {
        let before = stocks.len();
        stocks = dedupe_latest(&stocks);
        if stocks.len() < before {
            info!("Collapsed {} records down to {}", before, stocks.len());
        }
    }

    let mut strategies =
        StrategySelection::new(args.strategy.unwrap_or(config.default_strategy));
    for entry in &args.overrides {
        let Some((symbol, strategy)) = entry.split_once('=') else {
            bail!("Invalid override '{}', expected SYMBOL=STRATEGY", entry);
        };
        strategies
            .overrides
            .insert(symbol.to_string(), strategy.to_string());
    }

    let csv = generate_csv(&stocks, &args.dates, &strategies);

    match &args.output {
        Some(path) => {
            fs::write(path, &csv)
                .with_context(|| format!("Failed to write CSV to {}", path.display()))?;
            info!("✅ Wrote {} data rows to {}", stocks.len(), path.display());
        }
        None => println!("{}", csv),
    }

    Ok(())
}
