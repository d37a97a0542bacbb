//! Load stage: replace the Postgres fixtures table with the cleaned batch.
//!
//! Persistence is full-replace: every run drops and recreates the table inside
//! one transaction, so a failed load leaves the previous data intact.

use chrono::NaiveDateTime;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use tracing::{info, warn};

use crate::types::{CanonicalFixture, Outcome};

pub const FIXTURES_TABLE: &str = "partidos_river";

const CSV_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),
}

/// One line of the cleaned CSV, still string-typed.
#[derive(Debug, Deserialize)]
struct CleanedRow {
    fecha: String,
    competicion: String,
    local: String,
    visitante: String,
    g_river: String,
    g_rival: String,
    resultado_final: String,
}

pub fn read_cleaned_csv(path: &Path) -> Result<Vec<CanonicalFixture>, LoadError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut fixtures = Vec::new();
    for row in reader.deserialize() {
        let row: CleanedRow = row?;
        let Some(outcome) = Outcome::parse(&row.resultado_final) else {
            warn!(
                "Skipping row with unrecognized result {:?} ({} vs {})",
                row.resultado_final, row.local, row.visitante
            );
            continue;
        };
        fixtures.push(CanonicalFixture {
            kickoff: parse_csv_datetime(&row.fecha),
            competition: row.competicion,
            home_team: row.local,
            away_team: row.visitante,
            goals_for: parse_csv_goals(&row.g_river),
            goals_against: parse_csv_goals(&row.g_rival),
            outcome,
        });
    }
    Ok(fixtures)
}

fn parse_csv_datetime(field: &str) -> Option<NaiveDateTime> {
    if field.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(field, CSV_DATETIME_FORMAT).ok()
}

fn parse_csv_goals(field: &str) -> Option<u32> {
    field.parse().ok()
}

pub async fn connect(database_url: &str) -> Result<PgPool, LoadError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Overwrites the whole fixtures table with the given batch. No incremental
/// upsert, no diffing; the sink holds exactly the last successful scrape.
pub async fn replace_all(pool: &PgPool, fixtures: &[CanonicalFixture]) -> Result<(), LoadError> {
    let mut tx = pool.begin().await?;

    sqlx::query(&format!("DROP TABLE IF EXISTS {}", FIXTURES_TABLE))
        .execute(&mut *tx)
        .await?;

    sqlx::query(&format!(
        r#"
        CREATE TABLE {} (
            fecha TIMESTAMP,
            competicion TEXT NOT NULL,
            local TEXT NOT NULL,
            visitante TEXT NOT NULL,
            g_river INTEGER,
            g_rival INTEGER,
            resultado_final TEXT NOT NULL,
            UNIQUE (competicion, local, visitante, fecha)
        )
        "#,
        FIXTURES_TABLE
    ))
    .execute(&mut *tx)
    .await?;

    let pb = ProgressBar::new(fixtures.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} fixtures ({eta})")
            .unwrap(),
    );

    for fixture in fixtures {
        sqlx::query(&format!(
            r#"
            INSERT INTO {} (fecha, competicion, local, visitante, g_river, g_rival, resultado_final)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
            FIXTURES_TABLE
        ))
        .bind(fixture.kickoff)
        .bind(&fixture.competition)
        .bind(&fixture.home_team)
        .bind(&fixture.away_team)
        .bind(fixture.goals_for.map(|g| g as i32))
        .bind(fixture.goals_against.map(|g| g as i32))
        .bind(fixture.outcome.as_str())
        .execute(&mut *tx)
        .await?;
        pb.inc(1);
    }
    pb.finish();

    tx.commit().await?;
    info!("Replaced {} with {} fixtures", FIXTURES_TABLE, fixtures.len());
    Ok(())
}

pub async fn run_load(pool: &PgPool, csv_path: &Path) -> Result<usize, LoadError> {
    let fixtures = read_cleaned_csv(csv_path)?;
    replace_all(pool, &fixtures).await?;
    Ok(fixtures.len())
}
