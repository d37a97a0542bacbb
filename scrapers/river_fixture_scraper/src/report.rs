//! Reads the fixtures table back and renders the calendar and the season
//! summary as text.

use anyhow::Result;
use chrono::NaiveDateTime;
use sqlx::PgPool;

use crate::load::FIXTURES_TABLE;
use crate::types::{CanonicalFixture, Outcome};

const CALENDAR_DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

/// One row of the fixtures table as stored.
#[derive(Debug, sqlx::FromRow)]
struct FixtureRow {
    fecha: Option<NaiveDateTime>,
    competicion: String,
    local: String,
    visitante: String,
    g_river: Option<i32>,
    g_rival: Option<i32>,
    resultado_final: String,
}

impl FixtureRow {
    fn into_fixture(self) -> CanonicalFixture {
        CanonicalFixture {
            kickoff: self.fecha,
            competition: self.competicion,
            home_team: self.local,
            away_team: self.visitante,
            goals_for: self.g_river.and_then(|g| u32::try_from(g).ok()),
            goals_against: self.g_rival.and_then(|g| u32::try_from(g).ok()),
            outcome: Outcome::parse(&self.resultado_final).unwrap_or(Outcome::Pending),
        }
    }
}

/// Per-competition record over played fixtures, three points for a win and
/// one for a draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitionStanding {
    pub competition: String,
    pub played: usize,
    pub won: usize,
    pub drawn: usize,
    pub lost: usize,
    pub points: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSummary {
    /// Standings in first-appearance order of the competitions.
    pub standings: Vec<CompetitionStanding>,
    pub played: usize,
    pub won: usize,
    pub drawn: usize,
    pub lost: usize,
    pub average_goals_for: f64,
    pub clean_sheets: usize,
}

pub struct Reporter {
    pool: PgPool,
}

impl Reporter {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn fetch_fixtures(&self) -> Result<Vec<CanonicalFixture>> {
        let sql = format!(
            r#"
            SELECT fecha, competicion, local, visitante, g_river, g_rival, resultado_final
            FROM {}
            ORDER BY fecha ASC NULLS LAST
            "#,
            FIXTURES_TABLE
        );
        let rows: Vec<FixtureRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(FixtureRow::into_fixture).collect())
    }
}

/// Aggregates played fixtures only; pending rows count for nothing.
pub fn compute_summary(fixtures: &[CanonicalFixture]) -> SeasonSummary {
    let mut standings: Vec<CompetitionStanding> = Vec::new();
    let mut played = 0;
    let mut won = 0;
    let mut drawn = 0;
    let mut lost = 0;
    let mut goals_total = 0u32;
    let mut goals_samples = 0;
    let mut clean_sheets = 0;

    for fixture in fixtures {
        if !fixture.outcome.is_played() {
            continue;
        }
        played += 1;
        match fixture.outcome {
            Outcome::Won => won += 1,
            Outcome::Drawn => drawn += 1,
            Outcome::Lost => lost += 1,
            Outcome::Pending => {}
        }

        let index = match standings
            .iter()
            .position(|s| s.competition == fixture.competition)
        {
            Some(index) => index,
            None => {
                standings.push(CompetitionStanding {
                    competition: fixture.competition.clone(),
                    played: 0,
                    won: 0,
                    drawn: 0,
                    lost: 0,
                    points: 0,
                });
                standings.len() - 1
            }
        };
        let standing = &mut standings[index];
        standing.played += 1;
        standing.points += fixture.outcome.points();
        match fixture.outcome {
            Outcome::Won => standing.won += 1,
            Outcome::Drawn => standing.drawn += 1,
            Outcome::Lost => standing.lost += 1,
            Outcome::Pending => {}
        }

        if let Some(goals_for) = fixture.goals_for {
            goals_total += goals_for;
            goals_samples += 1;
        }
        if fixture.goals_against == Some(0) {
            clean_sheets += 1;
        }
    }

    let average_goals_for = if goals_samples > 0 {
        goals_total as f64 / goals_samples as f64
    } else {
        0.0
    };

    SeasonSummary {
        standings,
        played,
        won,
        drawn,
        lost,
        average_goals_for,
        clean_sheets,
    }
}

/// Renders the fixtures grouped per competition, competitions in
/// first-appearance order. Unresolved kickoffs show as TBC.
pub fn render_calendar(fixtures: &[CanonicalFixture]) -> String {
    if fixtures.is_empty() {
        return "No fixtures stored yet. Run the pipeline first.\n".to_string();
    }

    let mut competitions: Vec<&str> = Vec::new();
    for fixture in fixtures {
        if !competitions.contains(&fixture.competition.as_str()) {
            competitions.push(&fixture.competition);
        }
    }

    let mut output = String::new();
    for competition in competitions {
        output.push_str(&format!("{}\n", competition.to_uppercase()));
        output.push_str("fecha\tlocal\tvisitante\tg_river\tg_rival\tresultado_final\n");
        for fixture in fixtures.iter().filter(|f| f.competition == competition) {
            let kickoff = fixture
                .kickoff
                .map(|k| k.format(CALENDAR_DATETIME_FORMAT).to_string())
                .unwrap_or_else(|| "TBC".to_string());
            output.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\n",
                kickoff,
                fixture.home_team,
                fixture.away_team,
                goal_text(fixture.goals_for),
                goal_text(fixture.goals_against),
                fixture.outcome.as_str()
            ));
        }
        output.push('\n');
    }
    output
}

pub fn render_summary(summary: &SeasonSummary) -> String {
    if summary.played == 0 {
        return "No played fixtures yet, nothing to summarize.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "Season summary:\n- Played: {}\n- Won: {} / Drawn: {} / Lost: {}\n",
        summary.played, summary.won, summary.drawn, summary.lost
    ));
    output.push_str(&format!(
        "- Average goals scored: {:.2}\n- Clean sheets: {}\n",
        summary.average_goals_for, summary.clean_sheets
    ));

    if !summary.standings.is_empty() {
        output.push_str("\nPoints per competition:\n");
        for standing in &summary.standings {
            output.push_str(&format!(
                "- {}: {} pts ({} played, {}W {}D {}L)\n",
                standing.competition,
                standing.points,
                standing.played,
                standing.won,
                standing.drawn,
                standing.lost
            ));
        }
    }
    output
}

fn goal_text(goals: Option<u32>) -> String {
    match goals {
        Some(count) => count.to_string(),
        None => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixture(
        competition: &str,
        home: &str,
        away: &str,
        goals: Option<(u32, u32)>,
        outcome: Outcome,
    ) -> CanonicalFixture {
        CanonicalFixture {
            kickoff: NaiveDate::from_ymd_opt(2026, 2, 1)
                .unwrap()
                .and_hms_opt(21, 0, 0),
            competition: competition.to_string(),
            home_team: home.to_string(),
            away_team: away.to_string(),
            goals_for: goals.map(|(f, _)| f),
            goals_against: goals.map(|(_, a)| a),
            outcome,
        }
    }

    fn sample_fixtures() -> Vec<CanonicalFixture> {
        vec![
            fixture(
                "Torneo Apertura",
                "CA River Plate",
                "Independiente",
                Some((2, 1)),
                Outcome::Won,
            ),
            fixture(
                "Torneo Apertura",
                "Racing Club",
                "CA River Plate",
                Some((0, 0)),
                Outcome::Drawn,
            ),
            fixture(
                "Copa Argentina",
                "CA River Plate",
                "Talleres",
                Some((0, 1)),
                Outcome::Lost,
            ),
            fixture(
                "Torneo Apertura",
                "CA River Plate",
                "Boca Juniors",
                None,
                Outcome::Pending,
            ),
        ]
    }

    #[test]
    fn test_summary_counts_played_fixtures_only() {
        let summary = compute_summary(&sample_fixtures());
        assert_eq!(summary.played, 3);
        assert_eq!(summary.won, 1);
        assert_eq!(summary.drawn, 1);
        assert_eq!(summary.lost, 1);
    }

    #[test]
    fn test_summary_points_per_competition_in_first_appearance_order() {
        let summary = compute_summary(&sample_fixtures());
        assert_eq!(summary.standings.len(), 2);

        assert_eq!(summary.standings[0].competition, "Torneo Apertura");
        assert_eq!(summary.standings[0].played, 2);
        assert_eq!(summary.standings[0].points, 4);
        assert_eq!(summary.standings[0].won, 1);
        assert_eq!(summary.standings[0].drawn, 1);

        assert_eq!(summary.standings[1].competition, "Copa Argentina");
        assert_eq!(summary.standings[1].points, 0);
        assert_eq!(summary.standings[1].lost, 1);
    }

    #[test]
    fn test_summary_goal_aggregates() {
        let summary = compute_summary(&sample_fixtures());
        // (2 + 0 + 0) / 3 played fixtures with recorded goals.
        assert!((summary.average_goals_for - 2.0 / 3.0).abs() < 1e-9);
        // Only the 0-0 draw kept the opponent off the scoresheet.
        assert_eq!(summary.clean_sheets, 1);
    }

    #[test]
    fn test_summary_of_empty_batch() {
        let summary = compute_summary(&[]);
        assert_eq!(summary.played, 0);
        assert_eq!(summary.average_goals_for, 0.0);
        assert!(summary.standings.is_empty());
    }

    #[test]
    fn test_render_notices_when_nothing_to_show() {
        assert_eq!(
            render_calendar(&[]),
            "No fixtures stored yet. Run the pipeline first.\n"
        );

        let pending_only = vec![fixture(
            "Torneo Apertura",
            "CA River Plate",
            "Boca Juniors",
            None,
            Outcome::Pending,
        )];
        let summary = compute_summary(&pending_only);
        assert_eq!(
            render_summary(&summary),
            "No played fixtures yet, nothing to summarize.\n"
        );
    }

    #[test]
    fn test_calendar_groups_by_competition() {
        let calendar = render_calendar(&sample_fixtures());
        let apertura = calendar.find("TORNEO APERTURA").unwrap();
        let copa = calendar.find("COPA ARGENTINA").unwrap();
        assert!(apertura < copa);
        assert!(calendar.contains("01/02/2026 21:00\tCA River Plate\tIndependiente\t2\t1\tGanó"));
        assert!(calendar.contains("CA River Plate\tBoca Juniors\t-\t-\tPendiente"));
    }

    #[test]
    fn test_calendar_shows_tbc_for_unresolved_kickoff() {
        let mut fixtures = sample_fixtures();
        fixtures[3].kickoff = None;
        let calendar = render_calendar(&fixtures);
        assert!(calendar.contains("TBC\tCA River Plate\tBoca Juniors"));
    }

    #[test]
    fn test_render_summary_layout() {
        let summary = compute_summary(&sample_fixtures());
        let text = render_summary(&summary);
        assert!(text.contains("- Played: 3"));
        assert!(text.contains("- Won: 1 / Drawn: 1 / Lost: 1"));
        assert!(text.contains("- Clean sheets: 1"));
        assert!(text.contains("- Torneo Apertura: 4 pts (2 played, 1W 1D 0L)"));
    }
}
