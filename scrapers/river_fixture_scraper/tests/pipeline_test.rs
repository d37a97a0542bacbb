use anyhow::Result;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

use river_fixture_scraper::config::{ClubConfig, NormalizerConfig, ScrapingConfig};
use river_fixture_scraper::extract::{parse_fixtures_page, FixtureExtractor, WebHtmlFetcher};
use river_fixture_scraper::load::read_cleaned_csv;
use river_fixture_scraper::normalize::FixtureNormalizer;
use river_fixture_scraper::report::compute_summary;
use river_fixture_scraper::transform::run_transform;
use river_fixture_scraper::types::{Outcome, RawFixture};

const RESULTS_PAGE: &str = include_str!("fixtures/partidos_river_2026.html");

fn normalizer() -> FixtureNormalizer {
    FixtureNormalizer::new("River Plate", &NormalizerConfig::default())
}

#[test]
fn test_parse_results_page() {
    let fixtures = parse_fixtures_page(RESULTS_PAGE);

    // Nine scraped rows minus the one without a marker box.
    assert_eq!(fixtures.len(), 8);

    assert_eq!(fixtures[0].competition, "Torneo Apertura");
    assert_eq!(fixtures[0].date_text, "24 Ene 26");
    assert_eq!(fixtures[0].home_team, "CA River Plate");
    assert_eq!(fixtures[0].away_team, "Boca Juniors");
    assert_eq!(fixtures[0].time_text, "21:00");
    assert_eq!(fixtures[0].score_text, "21:00");

    // Markers split across spans still come out as one score string.
    assert_eq!(fixtures[1].score_text, "1-3");
    assert_eq!(fixtures[1].home_team, "Racing Club");

    assert!(!fixtures
        .iter()
        .any(|f| f.away_team == "Racing Club" && f.date_text == "17 Mar 26"));

    assert_eq!(fixtures[5].competition, "Copa Argentina");
    assert_eq!(fixtures[7].date_text, "Por definir");
}

#[test]
fn test_normalize_scraped_rows() {
    let fixtures = normalizer().normalize_all(&parse_fixtures_page(RESULTS_PAGE));
    assert_eq!(fixtures.len(), 8);

    let kickoff = |y, mo, d, h, mi| {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, 0)
    };

    // Sorted by kickoff with the undated fixture last.
    assert_eq!(fixtures[0].kickoff, kickoff(2026, 1, 24, 21, 0));
    assert_eq!(fixtures[0].outcome, Outcome::Pending);

    assert_eq!(fixtures[1].kickoff, kickoff(2026, 2, 1, 0, 0));
    assert_eq!(fixtures[1].home_team, "Racing Club");
    assert_eq!(fixtures[1].goals_for, Some(3));
    assert_eq!(fixtures[1].goals_against, Some(1));
    assert_eq!(fixtures[1].outcome, Outcome::Won);

    assert_eq!(fixtures[2].away_team, "Independiente");
    assert_eq!(fixtures[2].outcome, Outcome::Won);

    // Postponed marker keeps the date but no goals.
    assert_eq!(fixtures[3].home_team, "San Lorenzo");
    assert_eq!(fixtures[3].kickoff, kickoff(2026, 3, 22, 0, 0));
    assert_eq!(fixtures[3].goals_for, None);
    assert_eq!(fixtures[3].outcome, Outcome::Pending);

    assert_eq!(fixtures[4].away_team, "Talleres");
    assert_eq!(fixtures[4].outcome, Outcome::Drawn);

    assert_eq!(fixtures[5].away_team, "Gimnasia LP");
    assert_eq!(fixtures[5].kickoff, kickoff(2026, 5, 14, 17, 30));

    assert_eq!(fixtures[6].home_team, "Estudiantes");
    assert_eq!(fixtures[6].goals_for, Some(2));
    assert_eq!(fixtures[6].goals_against, Some(0));

    assert_eq!(fixtures[7].kickoff, None);
    assert_eq!(fixtures[7].away_team, "Boca Juniors");
}

#[test]
fn test_transform_round_trips_through_cleaned_csv() -> Result<()> {
    let dir = tempdir()?;
    let raw_path = dir.path().join("river_raw_data.json");
    let cleaned_path = dir.path().join("river_cleaned.csv");

    let raw = parse_fixtures_page(RESULTS_PAGE);
    fs::write(&raw_path, serde_json::to_string_pretty(&raw)?)?;

    let written = run_transform(&normalizer(), &raw_path, &cleaned_path)?;
    let read_back = read_cleaned_csv(&cleaned_path)?;

    assert_eq!(read_back, written);
    Ok(())
}

#[test]
fn test_summary_over_scraped_season() {
    let fixtures = normalizer().normalize_all(&parse_fixtures_page(RESULTS_PAGE));
    let summary = compute_summary(&fixtures);

    assert_eq!(summary.played, 4);
    assert_eq!(summary.won, 3);
    assert_eq!(summary.drawn, 1);
    assert_eq!(summary.lost, 0);
    assert_eq!(summary.clean_sheets, 2);
    assert!((summary.average_goals_for - 1.75).abs() < 1e-9);

    assert_eq!(summary.standings.len(), 2);
    assert_eq!(summary.standings[0].competition, "Torneo Apertura");
    assert_eq!(summary.standings[0].points, 7);
    assert_eq!(summary.standings[0].played, 3);
    assert_eq!(summary.standings[1].competition, "Copa Argentina");
    assert_eq!(summary.standings[1].points, 3);
}

#[tokio::test]
async fn test_extract_against_local_server() -> Result<()> {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/equipo/partidos/ca-river-plate/2026")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(RESULTS_PAGE)
        .create_async()
        .await;

    let club = ClubConfig {
        base_url: server.url(),
        ..ClubConfig::default()
    };
    let fetcher = WebHtmlFetcher::new(&ScrapingConfig::default())?;
    let extractor = FixtureExtractor::new(fetcher);

    let dir = tempdir()?;
    let staged_path = dir.path().join("river_raw_data.json");
    let fixtures = extractor.run(&club.fixtures_url(), &staged_path).await?;

    mock.assert_async().await;
    assert_eq!(fixtures.len(), 8);

    let staged: Vec<RawFixture> = serde_json::from_str(&fs::read_to_string(&staged_path)?)?;
    assert_eq!(staged, fixtures);
    Ok(())
}
