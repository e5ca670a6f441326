//! Command line entry point: one probe or collection per invocation

use clap::{Parser, Subcommand};
use rugby_scrape::{Config, Entity, RankingsSource, Scraper, YearRange};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rugby-scrape", version, about = "Collect Pulse Live rugby statistics into CSV")]
struct Cli {
    /// JSON configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe the countries endpoint and store json/country_meta.json
    CountryMeta,
    /// Write csv/countries.csv (plus sports.csv and types.csv)
    Countries,
    /// Probe matches per year and store json/match_meta_YEAR.json
    MatchMeta {
        /// First year
        first: i32,
        /// Last year (defaults to FIRST)
        last: Option<i32>,
    },
    /// Write csv/matches_YEAR.csv for each year
    Matches {
        /// First year
        first: i32,
        /// Last year (defaults to FIRST)
        last: Option<i32>,
    },
    /// Fetch the rankings snapshot and store it under json/
    RankingsMeta {
        /// Which rankings endpoint
        #[arg(value_enum, default_value_t = RankingsSource::V3)]
        source: RankingsSource,
    },
    /// Write the rankings CSV
    Rankings {
        /// Which rankings endpoint
        #[arg(value_enum, default_value_t = RankingsSource::V3)]
        source: RankingsSource,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Run failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> rugby_scrape::Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if config.retry.max_attempts.is_none() {
        tracing::info!("Retry policy is unbounded; an unreachable API will stall this run");
    }
    let scraper = Scraper::new(config)?;

    match cli.command {
        Command::CountryMeta => {
            scraper.probe(Entity::Countries).await?;
        }
        Command::Countries => {
            scraper.collect(Entity::Countries).await?;
        }
        Command::MatchMeta { first, last } => {
            scraper.probe_years(YearRange::new(first, last)?).await?;
        }
        Command::Matches { first, last } => {
            scraper.collect_years(YearRange::new(first, last)?).await?;
        }
        Command::RankingsMeta { source } => {
            scraper.probe(Entity::Rankings(source)).await?;
        }
        Command::Rankings { source } => {
            scraper.collect(Entity::Rankings(source)).await?;
        }
    }
    Ok(())
}
