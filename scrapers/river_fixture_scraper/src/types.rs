use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One fixture row exactly as scraped, all fields still free-form text.
/// The serde names follow the resultados-futbol page vocabulary so the raw
/// JSON snapshot stays readable next to the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFixture {
    #[serde(rename = "fecha")]
    pub date_text: String,
    #[serde(rename = "horario")]
    pub time_text: String,
    #[serde(rename = "competicion")]
    pub competition: String,
    #[serde(rename = "local")]
    pub home_team: String,
    #[serde(rename = "visitante")]
    pub away_team: String,
    #[serde(rename = "marcador_raw")]
    pub score_text: String,
}

/// A normalized fixture ready for the `partidos_river` table. The serde
/// names are the downstream schema and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalFixture {
    #[serde(rename = "fecha")]
    pub kickoff: Option<NaiveDateTime>,
    #[serde(rename = "competicion")]
    pub competition: String,
    #[serde(rename = "local")]
    pub home_team: String,
    #[serde(rename = "visitante")]
    pub away_team: String,
    #[serde(rename = "g_river")]
    pub goals_for: Option<u32>,
    #[serde(rename = "g_rival")]
    pub goals_against: Option<u32>,
    #[serde(rename = "resultado_final")]
    pub outcome: Outcome,
}

/// Result of a fixture from the tracked club's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[serde(rename = "Ganó")]
    Won,
    #[serde(rename = "Empató")]
    Drawn,
    #[serde(rename = "Perdió")]
    Lost,
    #[serde(rename = "Pendiente")]
    Pending,
}

impl Outcome {
    /// The literal stored in `resultado_final`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Won => "Ganó",
            Outcome::Drawn => "Empató",
            Outcome::Lost => "Perdió",
            Outcome::Pending => "Pendiente",
        }
    }

    /// Inverse of [`Outcome::as_str`], for reading our own artifacts back.
    pub fn parse(text: &str) -> Option<Outcome> {
        match text {
            "Ganó" => Some(Outcome::Won),
            "Empató" => Some(Outcome::Drawn),
            "Perdió" => Some(Outcome::Lost),
            "Pendiente" => Some(Outcome::Pending),
            _ => None,
        }
    }

    /// League points awarded for this outcome.
    pub fn points(&self) -> u32 {
        match self {
            Outcome::Won => 3,
            Outcome::Drawn => 1,
            Outcome::Lost | Outcome::Pending => 0,
        }
    }

    pub fn is_played(&self) -> bool {
        !matches!(self, Outcome::Pending)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
