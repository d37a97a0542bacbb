use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::{Path, PathBuf};
use tracing::info;

use river_fixture_scraper::config::EtlConfig;
use river_fixture_scraper::extract::{FixtureExtractor, WebHtmlFetcher};
use river_fixture_scraper::load;
use river_fixture_scraper::normalize::FixtureNormalizer;
use river_fixture_scraper::report::{self, Reporter};
use river_fixture_scraper::transform;

const RAW_JSON_PATH: &str = "data/river_raw_data.json";
const CLEANED_CSV_PATH: &str = "data/river_cleaned.csv";

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape the results page and stage the raw fixture rows as JSON
    Extract {
        /// Where to write the staged rows
        #[arg(long, default_value = RAW_JSON_PATH)]
        output: PathBuf,
    },
    /// Normalize staged rows into the cleaned CSV
    Transform {
        #[arg(long, default_value = RAW_JSON_PATH)]
        input: PathBuf,
        #[arg(long, default_value = CLEANED_CSV_PATH)]
        output: PathBuf,
    },
    /// Replace the Postgres fixtures table with the cleaned CSV
    Load {
        #[arg(long, default_value = CLEANED_CSV_PATH)]
        input: PathBuf,
    },
    /// Run extract, transform and load back to back
    Run,
    /// Print the stored fixtures grouped per competition
    Calendar,
    /// Print season statistics over played fixtures
    Summary,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = EtlConfig::from_env();

    match cli.command {
        Commands::Extract { output } => {
            run_extract(&config, &output).await?;
        }
        Commands::Transform { input, output } => {
            let normalizer =
                FixtureNormalizer::new(&config.club.tracked_club, &config.normalizer);
            transform::run_transform(&normalizer, &input, &output)?;
        }
        Commands::Load { input } => {
            let pool = load::connect(&config.database.url()).await?;
            let count = load::run_load(&pool, &input).await?;
            info!("Loaded {} fixtures", count);
        }
        Commands::Run => {
            run_extract(&config, Path::new(RAW_JSON_PATH)).await?;
            let normalizer =
                FixtureNormalizer::new(&config.club.tracked_club, &config.normalizer);
            transform::run_transform(
                &normalizer,
                Path::new(RAW_JSON_PATH),
                Path::new(CLEANED_CSV_PATH),
            )?;
            let pool = load::connect(&config.database.url()).await?;
            let count = load::run_load(&pool, Path::new(CLEANED_CSV_PATH)).await?;
            info!("Pipeline finished, {} fixtures loaded", count);
        }
        Commands::Calendar => {
            let reporter = Reporter::new(load::connect(&config.database.url()).await?);
            let fixtures = reporter.fetch_fixtures().await?;
            print!("{}", report::render_calendar(&fixtures));
        }
        Commands::Summary => {
            let reporter = Reporter::new(load::connect(&config.database.url()).await?);
            let fixtures = reporter.fetch_fixtures().await?;
            let summary = report::compute_summary(&fixtures);
            print!("{}", report::render_summary(&summary));
        }
    }

    Ok(())
}

async fn run_extract(config: &EtlConfig, output: &Path) -> Result<()> {
    let fetcher = WebHtmlFetcher::new(&config.scraping)?;
    let extractor = FixtureExtractor::new(fetcher);
    extractor.run(&config.club.fixtures_url(), output).await?;
    Ok(())
}
