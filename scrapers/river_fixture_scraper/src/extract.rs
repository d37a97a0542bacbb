//! Extract stage: fetch the results page and collect raw fixture rows.
//!
//! The page groups fixtures into one `div.liga` block per competition, each
//! holding a marker table. No interpretation happens here; every cell is kept
//! as scraped text and handed to the normalizer.

use anyhow::{Context, Result};
use scraper::{ElementRef, Html, Selector};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::ScrapingConfig;
use crate::types::RawFixture;

#[allow(async_fn_in_trait)]
pub trait HtmlFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String>;
}

pub struct WebHtmlFetcher {
    client: reqwest::Client,
}

impl WebHtmlFetcher {
    pub fn new(config: &ScrapingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

impl HtmlFetcher for WebHtmlFetcher {
    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

pub struct FixtureExtractor<F: HtmlFetcher> {
    fetcher: F,
}

impl<F: HtmlFetcher> FixtureExtractor<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub async fn scrape(&self, url: &str) -> Result<Vec<RawFixture>> {
        info!("Fetching fixtures page {}", url);
        let html = self.fetcher.fetch_html(url).await?;
        let fixtures = parse_fixtures_page(&html);
        info!("Scraped {} fixture rows", fixtures.len());
        Ok(fixtures)
    }

    /// Scrapes the page and stages the raw rows as JSON for the transform
    /// stage.
    pub async fn run(&self, url: &str, output_path: &Path) -> Result<Vec<RawFixture>> {
        let fixtures = self.scrape(url).await?;
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(output_path, serde_json::to_string_pretty(&fixtures)?)?;
        info!("Saved {} raw fixtures to {}", fixtures.len(), output_path.display());
        Ok(fixtures)
    }
}

/// Walks the per-competition blocks and collects one raw row per fixture.
/// Rows missing any expected cell are skipped, never failed on.
pub fn parse_fixtures_page(html: &str) -> Vec<RawFixture> {
    let document = Html::parse_document(html);

    let block_selector = Selector::parse("div.liga").unwrap();
    let title_selector = Selector::parse("div.title a").unwrap();
    let row_selector = Selector::parse("table.tablemarcador tbody tr").unwrap();
    let date_selector = Selector::parse("td.time").unwrap();
    let home_selector = Selector::parse("td.team-home").unwrap();
    let away_selector = Selector::parse("td.team-away").unwrap();
    let marker_selector = Selector::parse("div.marker_box").unwrap();

    let mut fixtures = Vec::new();
    for block in document.select(&block_selector) {
        let Some(title) = block.select(&title_selector).next() else {
            continue;
        };
        let competition = cell_text(&title);

        for row in block.select(&row_selector) {
            let Some(date) = row.select(&date_selector).next() else {
                debug!("Skipping row without a date cell in {}", competition);
                continue;
            };
            let Some(home) = row.select(&home_selector).next() else {
                debug!("Skipping row without a home team cell in {}", competition);
                continue;
            };
            let Some(away) = row.select(&away_selector).next() else {
                debug!("Skipping row without an away team cell in {}", competition);
                continue;
            };
            let Some(marker) = row.select(&marker_selector).next() else {
                debug!("Skipping row without a marker box in {}", competition);
                continue;
            };

            // The marker box shows the kickoff time before the match and the
            // final score after it. Keep it in both raw fields and let the
            // normalizer disambiguate.
            let marker_text = cell_text(&marker);
            fixtures.push(RawFixture {
                date_text: cell_text(&date),
                time_text: marker_text.clone(),
                competition: competition.clone(),
                home_team: cell_text(&home),
                away_team: cell_text(&away),
                score_text: marker_text,
            });
        }
    }
    fixtures
}

fn cell_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
