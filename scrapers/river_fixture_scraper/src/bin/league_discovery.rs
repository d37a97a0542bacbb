//! Lists the league ids soccerdataapi.com knows for a country, useful when
//! pointing the scraper at a new competition.

use anyhow::{anyhow, Result};
use clap::Parser;
use dotenv::dotenv;
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Country whose leagues to list
    #[arg(long, default_value = "argentina")]
    country: String,
}

#[derive(Debug, Deserialize)]
struct LeagueResponse {
    #[serde(default)]
    results: Vec<League>,
}

#[derive(Debug, Deserialize)]
struct League {
    id: i64,
    name: String,
    country: Country,
}

#[derive(Debug, Deserialize)]
struct Country {
    name: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let api_key = std::env::var("SOCCER_API_KEY")
        .map_err(|_| anyhow!("SOCCER_API_KEY must be set"))?;

    let url = format!("https://api.soccerdataapi.com/league/?auth_token={}", api_key);
    let client = reqwest::Client::new();
    let response: LeagueResponse = client
        .get(&url)
        .header("Content-Type", "application/json")
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let country = args.country.to_lowercase();
    println!("--- Leagues in {} ---", args.country);
    for league in response
        .results
        .iter()
        .filter(|l| l.country.name.to_lowercase() == country)
    {
        println!("ID: {} | Name: {}", league.id, league.name);
    }

    Ok(())
}
