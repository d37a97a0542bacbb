//! Turns raw scraped fixture rows into canonical records.
//!
//! The results page mixes clock times and final scores in the same cell, spells
//! months with Spanish abbreviations and two-digit years, and lists fixtures in
//! document order. This module resolves all of that into typed values. A bad
//! row never aborts the batch; unparseable fields degrade to absent values and
//! the outcome falls back to [`Outcome::Pending`].

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use crate::config::NormalizerConfig;
use crate::types::{CanonicalFixture, Outcome, RawFixture};

/// Month abbreviations as they appear on resultados-futbol.com, mapped to
/// two-digit month numbers. The table is closed: an abbreviation outside it
/// leaves the kickoff unresolved instead of guessing.
const SPANISH_MONTHS: [(&str, &str); 12] = [
    ("Ene", "01"),
    ("Feb", "02"),
    ("Mar", "03"),
    ("Abr", "04"),
    ("May", "05"),
    ("Jun", "06"),
    ("Jul", "07"),
    ("Ago", "08"),
    ("Sep", "09"),
    ("Oct", "10"),
    ("Nov", "11"),
    ("Dic", "12"),
];

const DATETIME_FORMAT: &str = "%d %m %y %H:%M";
const DATE_ONLY_FORMAT: &str = "%d %m %y";

/// Converts one [`RawFixture`] into one [`CanonicalFixture`].
///
/// Pure and total over each row: no I/O, no errors raised, same input always
/// yields the same output.
#[derive(Debug, Clone)]
pub struct FixtureNormalizer {
    tracked_club: String,
    default_time: String,
    year_pivot: i32,
}

impl FixtureNormalizer {
    pub fn new(tracked_club: &str, config: &NormalizerConfig) -> Self {
        Self {
            tracked_club: tracked_club.to_string(),
            default_time: config.default_time.clone(),
            year_pivot: config.year_pivot,
        }
    }

    /// Decides whether the scraped score cell holds a clock time or a final
    /// score, and resolves the kickoff-time text either way.
    ///
    /// A string counts as a clock time iff it contains `:` and no `-`; a `-`
    /// is definitive evidence of a final score, in which case the time fields
    /// are ignored and the configured default applies. Returns whether the
    /// score cell was time-only, plus the resolved time text.
    pub fn classify_score_field(&self, score_text: &str, time_text: &str) -> (bool, String) {
        if score_text.contains('-') {
            return (false, self.default_time.clone());
        }
        if is_clock_time(score_text) {
            return (true, score_text.to_string());
        }
        if is_clock_time(time_text) {
            return (true, time_text.to_string());
        }
        (true, self.default_time.clone())
    }

    /// Parses `"24 Ene 26"` plus a resolved `"HH:MM"` into a timestamp.
    ///
    /// The month abbreviation is substituted via [`SPANISH_MONTHS`], then the
    /// combined string is parsed strictly; if that fails the date portion is
    /// retried alone with the time defaulting to midnight. Anything else
    /// yields `None` rather than a guessed date. Two-digit years resolve into
    /// the century window starting at the configured pivot year.
    pub fn parse_kickoff(&self, date_text: &str, time_text: &str) -> Option<NaiveDateTime> {
        let numeric_date = substitute_month(date_text);
        let combined = format!("{} {}", numeric_date.trim(), time_text.trim());

        let parsed = NaiveDateTime::parse_from_str(&combined, DATETIME_FORMAT)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(numeric_date.trim(), DATE_ONLY_FORMAT)
                    .ok()
                    .map(|date| date.and_time(NaiveTime::MIN))
            });

        match parsed {
            Some(kickoff) => self.window_year(kickoff),
            None => {
                debug!(
                    "Could not parse kickoff from {:?} {:?}, leaving absent",
                    date_text, time_text
                );
                None
            }
        }
    }

    /// Splits a `"g1-g2"` score from the tracked club's perspective.
    ///
    /// The club is matched as a substring of the home name, falling back to
    /// the away side; both goal substrings must be strictly numeric, otherwise
    /// the row degrades to a pending result with absent goal counts.
    pub fn classify_outcome(
        &self,
        home_team: &str,
        away_team: &str,
        score_text: &str,
    ) -> (Option<u32>, Option<u32>, Outcome) {
        let Some((first, second)) = score_text.split_once('-') else {
            return (None, None, Outcome::Pending);
        };
        let first = first.trim();
        let second = second.trim();

        let tracked_is_home = home_team.contains(&self.tracked_club);
        if !tracked_is_home && !away_team.contains(&self.tracked_club) {
            debug!(
                "Tracked club {:?} not found in {:?} vs {:?}, assuming away",
                self.tracked_club, home_team, away_team
            );
        }
        let (for_text, against_text) = if tracked_is_home {
            (first, second)
        } else {
            (second, first)
        };

        match (parse_goals(for_text), parse_goals(against_text)) {
            (Some(goals_for), Some(goals_against)) => {
                let outcome = match goals_for.cmp(&goals_against) {
                    std::cmp::Ordering::Greater => Outcome::Won,
                    std::cmp::Ordering::Less => Outcome::Lost,
                    std::cmp::Ordering::Equal => Outcome::Drawn,
                };
                (Some(goals_for), Some(goals_against), outcome)
            }
            _ => (None, None, Outcome::Pending),
        }
    }

    pub fn normalize(&self, raw: &RawFixture) -> CanonicalFixture {
        let (_, time_text) = self.classify_score_field(&raw.score_text, &raw.time_text);
        let kickoff = self.parse_kickoff(&raw.date_text, &time_text);
        let (goals_for, goals_against, outcome) =
            self.classify_outcome(&raw.home_team, &raw.away_team, &raw.score_text);

        CanonicalFixture {
            kickoff,
            competition: raw.competition.clone(),
            home_team: raw.home_team.clone(),
            away_team: raw.away_team.clone(),
            goals_for,
            goals_against,
            outcome,
        }
    }

    /// Normalizes a whole scrape and sorts it by kickoff ascending, with
    /// unresolved kickoffs grouped at the end in their scraped order.
    pub fn normalize_all(&self, raws: &[RawFixture]) -> Vec<CanonicalFixture> {
        let mut fixtures: Vec<CanonicalFixture> =
            raws.iter().map(|raw| self.normalize(raw)).collect();
        fixtures.sort_by_key(|fixture| (fixture.kickoff.is_none(), fixture.kickoff));
        fixtures
    }

    /// Re-anchors a two-digit year into `[year_pivot, year_pivot + 99]`.
    fn window_year(&self, parsed: NaiveDateTime) -> Option<NaiveDateTime> {
        let two_digit = parsed.year().rem_euclid(100);
        let offset = (two_digit - self.year_pivot.rem_euclid(100)).rem_euclid(100);
        parsed.with_year(self.year_pivot + offset)
    }
}

fn is_clock_time(text: &str) -> bool {
    text.contains(':') && !text.contains('-')
}

fn substitute_month(date_text: &str) -> String {
    for (name, number) in SPANISH_MONTHS {
        if date_text.contains(name) {
            return date_text.replace(name, number);
        }
    }
    date_text.to_string()
}

fn parse_goals(text: &str) -> Option<u32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
