//! Transform stage: run the normalizer over staged raw rows and write the
//! cleaned CSV consumed by the load stage.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::normalize::FixtureNormalizer;
use crate::types::{CanonicalFixture, RawFixture};

pub const CSV_HEADERS: [&str; 7] = [
    "fecha",
    "competicion",
    "local",
    "visitante",
    "g_river",
    "g_rival",
    "resultado_final",
];

const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn read_raw_fixtures(path: &Path) -> Result<Vec<RawFixture>> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read staged fixtures from {}", path.display()))?;
    let fixtures: Vec<RawFixture> = serde_json::from_str(&json)
        .with_context(|| format!("Invalid staged fixture JSON in {}", path.display()))?;
    Ok(fixtures)
}

/// Writes the canonical batch as CSV. Absent goals become `-` and an absent
/// kickoff becomes an empty field, which the load stage maps back to NULL.
pub fn write_cleaned_csv(path: &Path, fixtures: &[CanonicalFixture]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(CSV_HEADERS)?;
    for fixture in fixtures {
        writer.write_record(&csv_record(fixture))?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_record(fixture: &CanonicalFixture) -> [String; 7] {
    [
        fixture
            .kickoff
            .map(|kickoff| kickoff.format(CSV_DATETIME_FORMAT).to_string())
            .unwrap_or_default(),
        fixture.competition.clone(),
        fixture.home_team.clone(),
        fixture.away_team.clone(),
        goal_field(fixture.goals_for),
        goal_field(fixture.goals_against),
        fixture.outcome.as_str().to_string(),
    ]
}

fn goal_field(goals: Option<u32>) -> String {
    match goals {
        Some(count) => count.to_string(),
        None => "-".to_string(),
    }
}

pub fn run_transform(
    normalizer: &FixtureNormalizer,
    input_path: &Path,
    output_path: &Path,
) -> Result<Vec<CanonicalFixture>> {
    let raw = read_raw_fixtures(input_path)?;
    let fixtures = normalizer.normalize_all(&raw);
    write_cleaned_csv(output_path, &fixtures)?;
    info!(
        "Transformed {} fixtures into {}",
        fixtures.len(),
        output_path.display()
    );
    Ok(fixtures)
}
