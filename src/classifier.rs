use std::collections::BTreeSet;

use serde::{Serialize, Serializer};
use tracing::debug;

const CONF_STRONG: i32 = 50;
const CONF_LEAN: i32 = 45;

const BTTS_ALL_AVERAGES: f64 = 0.8;
const BTTS_TIGHT_DEFENSE: f64 = 0.5;
const BTTS_ATTACK: f64 = 1.0;

const DEFAULT_HOME_SCORING: f64 = 1.2;
const DEFAULT_AWAY_SCORING: f64 = 0.9;
const MAX_HOME_GOALS: i64 = 4;
const MAX_AWAY_GOALS: i64 = 3;
const FALLBACK_SCORE: &str = "1-1";

pub const OVER_2_5: &str = "Over 2.5";
pub const UNDER_2_5: &str = "Under 2.5";
pub const UNDER_3_5: &str = "Under 3.5";
pub const BTTS_YES: &str = "Oui";
pub const BTTS_NO: &str = "Non";

const DEFAULT_BIG_CLUBS: [&str; 4] = ["Al Ahly", "Zamalek", "Zamalek SC", "Pyramids FC"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Home,
    Away,
    Draw,
    HomeOrDraw,
    DrawOrAway,
}

impl Outcome {
    pub fn code(self) -> &'static str {
        match self {
            Outcome::Home => "1",
            Outcome::Away => "2",
            Outcome::Draw => "X",
            Outcome::HomeOrDraw => "1X",
            Outcome::DrawOrAway => "X2",
        }
    }

    fn favours_home(self) -> bool {
        matches!(self, Outcome::Home | Outcome::HomeOrDraw)
    }

    fn favours_away(self) -> bool {
        matches!(self, Outcome::Away | Outcome::DrawOrAway)
    }

    fn describe(self, home: &str, away: &str) -> String {
        match self {
            Outcome::Home => format!("{home} gagne"),
            Outcome::Away => format!("{away} gagne"),
            Outcome::Draw => "Match Nul probable".to_string(),
            Outcome::HomeOrDraw => format!("DC {home}"),
            Outcome::DrawOrAway => format!("DC {away}"),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Raw 1X2 percentages as the upstream API sends them, e.g. `"45%"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutcomeProbabilities {
    pub home: String,
    pub draw: String,
    pub away: String,
}

impl OutcomeProbabilities {
    pub fn new(home: impl Into<String>, draw: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            home: home.into(),
            draw: draw.into(),
            away: away.into(),
        }
    }

    /// All three must parse; a single bad value invalidates the triple.
    pub fn parse(&self) -> Option<ParsedPercentages> {
        Some(ParsedPercentages {
            home: parse_percent(&self.home)?,
            draw: parse_percent(&self.draw)?,
            away: parse_percent(&self.away)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedPercentages {
    pub home: i32,
    pub draw: i32,
    pub away: i32,
}

impl ParsedPercentages {
    pub fn max(&self) -> i32 {
        self.home.max(self.draw).max(self.away)
    }
}

pub fn parse_percent(raw: &str) -> Option<i32> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();
    digits.parse::<i32>().ok()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalsEstimate {
    pub home: Option<String>,
    pub away: Option<String>,
    pub advice: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GoalAverages {
    pub total: Option<f64>,
    pub home: Option<f64>,
    pub away: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamGoalStats {
    pub goals_for: GoalAverages,
    pub goals_against: GoalAverages,
}

/// Club names that never get an outright away-win pick at home.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigClubs {
    names: BTreeSet<String>,
}

impl BigClubs {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(Into::into)
            .map(|n: String| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        Self { names }
    }

    pub fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Substring containment, not equality: "Zamalek" also covers "Zamalek SC".
    pub fn matches(&self, team: &str) -> bool {
        self.names.iter().any(|club| team.contains(club.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for BigClubs {
    fn default() -> Self {
        Self::new(DEFAULT_BIG_CLUBS)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ClassifierInput<'a> {
    pub probabilities: &'a OutcomeProbabilities,
    pub home_team: &'a str,
    pub away_team: &'a str,
    pub goals: &'a GoalsEstimate,
    pub home_stats: Option<&'a TeamGoalStats>,
    pub away_stats: Option<&'a TeamGoalStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub prediction: Outcome,
    pub prediction_text: String,
    pub confidence: u8,
    pub over_under: &'static str,
    pub btts: &'static str,
    pub exact_score: String,
}

pub fn classify(input: &ClassifierInput<'_>, big_clubs: &BigClubs) -> ClassificationResult {
    let (prediction, prediction_text) = determine_outcome(
        input.probabilities,
        input.home_team,
        input.away_team,
        big_clubs,
    );
    ClassificationResult {
        prediction,
        prediction_text,
        confidence: confidence_tier(input.probabilities),
        over_under: over_under(input.goals),
        btts: both_teams_score(input.home_stats, input.away_stats),
        exact_score: exact_score(prediction, input.home_stats, input.away_stats),
    }
}

struct RuleContext<'a> {
    pct: ParsedPercentages,
    home_team: &'a str,
    big_clubs: &'a BigClubs,
}

struct OutcomeRule {
    name: &'static str,
    applies: fn(&RuleContext<'_>) -> bool,
    outcome: Outcome,
}

// Priority order is observable at the threshold overlaps; keep it.
const OUTCOME_RULES: &[OutcomeRule] = &[
    OutcomeRule {
        name: "home_dominant",
        applies: |c| c.pct.home >= 45 && c.pct.away <= 10,
        outcome: Outcome::Home,
    },
    OutcomeRule {
        name: "away_dominant_big_club_home",
        applies: |c| c.pct.away >= 45 && c.pct.home <= 10 && c.big_clubs.matches(c.home_team),
        outcome: Outcome::HomeOrDraw,
    },
    OutcomeRule {
        name: "away_dominant",
        applies: |c| c.pct.away >= 45 && c.pct.home <= 10,
        outcome: Outcome::Away,
    },
    OutcomeRule {
        name: "home_or_draw",
        applies: |c| c.pct.home >= 35 && c.pct.draw >= 35,
        outcome: Outcome::HomeOrDraw,
    },
    OutcomeRule {
        name: "draw_or_away",
        applies: |c| c.pct.away >= 35 && c.pct.draw >= 35,
        outcome: Outcome::DrawOrAway,
    },
    OutcomeRule {
        name: "draw",
        applies: |c| c.pct.draw >= 40,
        outcome: Outcome::Draw,
    },
    OutcomeRule {
        name: "lean_home",
        applies: |c| c.pct.home > c.pct.away,
        outcome: Outcome::HomeOrDraw,
    },
    OutcomeRule {
        name: "lean_away",
        applies: |_| true,
        outcome: Outcome::DrawOrAway,
    },
];

pub fn determine_outcome(
    probabilities: &OutcomeProbabilities,
    home_team: &str,
    away_team: &str,
    big_clubs: &BigClubs,
) -> (Outcome, String) {
    let Some(pct) = probabilities.parse() else {
        debug!(?probabilities, "unparsable percentages, defaulting to draw");
        return (Outcome::Draw, "Match Nul".to_string());
    };

    let ctx = RuleContext {
        pct,
        home_team,
        big_clubs,
    };
    let rule = OUTCOME_RULES
        .iter()
        .find(|rule| (rule.applies)(&ctx))
        .unwrap_or(&OUTCOME_RULES[OUTCOME_RULES.len() - 1]);
    debug!(rule = rule.name, home_team, away_team, "outcome rule matched");
    (rule.outcome, rule.outcome.describe(home_team, away_team))
}

pub fn confidence_tier(probabilities: &OutcomeProbabilities) -> u8 {
    let Some(pct) = probabilities.parse() else {
        return 2;
    };
    let max = pct.max();
    if max >= CONF_STRONG {
        4
    } else if max >= CONF_LEAN {
        3
    } else {
        2
    }
}

pub fn over_under(goals: &GoalsEstimate) -> &'static str {
    let texts = [goals.home.as_deref(), goals.away.as_deref()];
    let sides = || texts.iter().flatten();

    if sides().any(|text| text.contains("3.5")) {
        return OVER_2_5;
    }
    if sides().any(|text| text.contains("2.5")) {
        return UNDER_3_5;
    }

    if let Some(advice) = goals.advice.as_deref() {
        if advice.contains("+2.5") || advice.contains("+3.5") {
            return OVER_2_5;
        }
        if advice.contains("-2.5") || advice.contains("-3.5") {
            return UNDER_2_5;
        }
    }

    UNDER_2_5
}

pub fn both_teams_score(
    home_stats: Option<&TeamGoalStats>,
    away_stats: Option<&TeamGoalStats>,
) -> &'static str {
    let home_attack = side_average(home_stats, |s| s.goals_for.total);
    let away_attack = side_average(away_stats, |s| s.goals_for.total);
    let home_defense = side_average(home_stats, |s| s.goals_against.total);
    let away_defense = side_average(away_stats, |s| s.goals_against.total);

    if [home_attack, away_attack, home_defense, away_defense]
        .iter()
        .all(|v| *v > BTTS_ALL_AVERAGES)
    {
        return BTTS_YES;
    }
    if home_defense < BTTS_TIGHT_DEFENSE || away_defense < BTTS_TIGHT_DEFENSE {
        return BTTS_NO;
    }
    if home_attack > BTTS_ATTACK && away_attack > BTTS_ATTACK {
        return BTTS_YES;
    }
    BTTS_NO
}

fn side_average(stats: Option<&TeamGoalStats>, pick: fn(&TeamGoalStats) -> Option<f64>) -> f64 {
    stats
        .and_then(pick)
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

pub fn exact_score(
    outcome: Outcome,
    home_stats: Option<&TeamGoalStats>,
    away_stats: Option<&TeamGoalStats>,
) -> String {
    let home_avg = home_stats
        .and_then(|s| s.goals_for.home)
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_HOME_SCORING);
    let away_avg = away_stats
        .and_then(|s| s.goals_for.away)
        .filter(|v| v.is_finite())
        .unwrap_or(DEFAULT_AWAY_SCORING);

    match synthesize_score(outcome, home_avg, away_avg) {
        Some((home, away)) => format!("{home}-{away}"),
        None => {
            debug!(home_avg, away_avg, "score synthesis failed, using fallback");
            FALLBACK_SCORE.to_string()
        }
    }
}

fn synthesize_score(outcome: Outcome, home_avg: f64, away_avg: f64) -> Option<(i64, i64)> {
    let mut home = round_goals(home_avg)?;
    let mut away = round_goals(away_avg)?;

    if outcome.favours_home() {
        home = home.max(away.saturating_add(1));
    } else if outcome.favours_away() {
        away = away.max(home.saturating_add(1));
    } else {
        away = home;
    }

    Some((home.clamp(0, MAX_HOME_GOALS), away.clamp(0, MAX_AWAY_GOALS)))
}

fn round_goals(avg: f64) -> Option<i64> {
    let rounded = avg.round();
    // Keeps the later saturating arithmetic meaningful for absurd averages.
    if !rounded.is_finite() || rounded.abs() > 1_000.0 {
        return None;
    }
    Some(rounded as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(for_total: f64, against_total: f64) -> TeamGoalStats {
        TeamGoalStats {
            goals_for: GoalAverages {
                total: Some(for_total),
                home: None,
                away: None,
            },
            goals_against: GoalAverages {
                total: Some(against_total),
                home: None,
                away: None,
            },
        }
    }

    #[test]
    fn percent_parsing_tolerates_whitespace_and_missing_suffix() {
        assert_eq!(parse_percent("45%"), Some(45));
        assert_eq!(parse_percent(" 7 % "), Some(7));
        assert_eq!(parse_percent("12"), Some(12));
        assert_eq!(parse_percent("abc%"), None);
        assert_eq!(parse_percent("45.5%"), None);
        assert_eq!(parse_percent(""), None);
    }

    #[test]
    fn rule_table_ends_with_catch_all() {
        let last = OUTCOME_RULES.last().expect("rules present");
        let ctx = RuleContext {
            pct: ParsedPercentages {
                home: 0,
                draw: 0,
                away: 0,
            },
            home_team: "",
            big_clubs: &BigClubs::empty(),
        };
        assert!((last.applies)(&ctx));
    }

    #[test]
    fn equal_home_and_away_lean_away() {
        let p = OutcomeProbabilities::new("30%", "30%", "30%");
        let (outcome, text) = determine_outcome(&p, "A", "B", &BigClubs::default());
        assert_eq!(outcome, Outcome::DrawOrAway);
        assert_eq!(text, "DC B");
    }

    #[test]
    fn weak_defense_overrides_strong_attacks() {
        let home = stats(2.0, 0.4);
        let away = stats(2.0, 1.0);
        assert_eq!(both_teams_score(Some(&home), Some(&away)), BTTS_NO);
    }

    #[test]
    fn attack_fallback_needs_both_sides() {
        let home = stats(1.2, 0.7);
        let away = stats(1.1, 0.6);
        assert_eq!(both_teams_score(Some(&home), Some(&away)), BTTS_YES);
        let away = stats(0.9, 0.6);
        assert_eq!(both_teams_score(Some(&home), Some(&away)), BTTS_NO);
    }

    #[test]
    fn nan_average_uses_default_scoring() {
        let home = TeamGoalStats {
            goals_for: GoalAverages {
                home: Some(f64::NAN),
                ..GoalAverages::default()
            },
            ..TeamGoalStats::default()
        };
        // defaults 1.2 -> 1 and 0.9 -> 1, draw keeps them level
        assert_eq!(exact_score(Outcome::Draw, Some(&home), None), "1-1");
    }
}
