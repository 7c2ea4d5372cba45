use std::fmt;

use serde::{Serialize, Serializer};

const OVER_25_SAFE: f64 = 3.5;
const OVER_25_SAFE_DEFENSIVE: f64 = 4.0;
const OVER_25_MODERATE: f64 = 3.0;
const OVER_15_SAFE: f64 = 2.5;
const OVER_15_MIN: f64 = 2.0;
const FAILED_TO_SCORE_MAX: f64 = 0.35;
const H2H_MIN_GOALS: f64 = 2.5;
const BIG_TEAM_GAP: f64 = 0.3;
const H2H_WINDOW: usize = 5;
const FORM_WINDOW: usize = 5;
const TICKET_LEGS: usize = 8;

pub const DEFAULT_MIN_EXPECTED: f64 = OVER_25_SAFE;

const DEFENSIVE_LEAGUES: &[&str] = &[
    "jordan", "thailand", "greece", "morocco", "iran", "turkey",
];

/// Season record of one side as the predictions endpoint reports it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamRecord {
    pub goals_for: f64,
    pub goals_against: f64,
    pub failed_to_score: u32,
    /// `None` when upstream omits it; treated as a single match played.
    pub played: Option<u32>,
    pub form: String,
}

impl TeamRecord {
    fn failed_to_score_rate(&self) -> f64 {
        let played = self.played.unwrap_or(1);
        if played == 0 {
            return 0.0;
        }
        f64::from(self.failed_to_score) / f64::from(played)
    }

    /// Points from the last five results over the fifteen available; 0.5 without form.
    fn form_strength(&self) -> f64 {
        let form = self.form.trim();
        if form.is_empty() {
            return 0.5;
        }
        let chars: Vec<char> = form.chars().collect();
        let recent = &chars[chars.len().saturating_sub(FORM_WINDOW)..];
        let points: u32 = recent
            .iter()
            .map(|r| match r {
                'W' => 3,
                'D' => 1,
                _ => 0,
            })
            .sum();
        f64::from(points) / 15.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlookInput {
    pub league: String,
    pub country: String,
    pub home: TeamRecord,
    pub away: TeamRecord,
    /// Total goals of past head-to-head meetings, most recent first.
    pub h2h_goals: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RiskAlert {
    HomeFailsToScore(f64),
    AwayFailsToScore(f64),
    DefensiveLeague(String),
    BigTeamAway,
}

impl fmt::Display for RiskAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskAlert::HomeFailsToScore(rate) => {
                write!(f, "Home fails to score {:.0}% of matches", rate * 100.0)
            }
            RiskAlert::AwayFailsToScore(rate) => {
                write!(f, "Away fails to score {:.0}% of matches", rate * 100.0)
            }
            RiskAlert::DefensiveLeague(country) => write!(f, "{country} - Ligue défensive"),
            RiskAlert::BigTeamAway => {
                write!(f, "Grande équipe en déplacement - risque défensif")
            }
        }
    }
}

impl Serialize for RiskAlert {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Over25Verdict {
    VerySafe,
    Moderate,
    Risky,
    Avoid,
}

impl Over25Verdict {
    pub fn label(self) -> &'static str {
        match self {
            Over25Verdict::VerySafe => "TRÈS SÛR",
            Over25Verdict::Moderate => "MOYEN",
            Over25Verdict::Risky => "RISQUÉ",
            Over25Verdict::Avoid => "ÉVITER",
        }
    }

    pub fn recommended(self) -> bool {
        matches!(self, Over25Verdict::VerySafe | Over25Verdict::Moderate)
    }

    /// Observed hit rate for the verdict band, in percent.
    pub fn probability(self) -> u8 {
        match self {
            Over25Verdict::VerySafe => 87,
            Over25Verdict::Moderate => 55,
            Over25Verdict::Risky | Over25Verdict::Avoid => 30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalOutlook {
    pub expected_goals: f64,
    pub h2h_avg: f64,
    pub home_fts_rate: f64,
    pub away_fts_rate: f64,
    pub alerts: Vec<RiskAlert>,
    pub over_25: Over25Verdict,
    pub over_25_probability: u8,
    pub over_15: bool,
    pub over_15_probability: u8,
}

pub fn expected_goals(home: &TeamRecord, away: &TeamRecord) -> f64 {
    if home.goals_for + away.goals_for == 0.0 {
        return 0.0;
    }
    let raw = (home.goals_for + away.goals_against) / 2.0
        + (away.goals_for + home.goals_against) / 2.0;
    round2(raw)
}

pub fn h2h_average(h2h_goals: &[u32]) -> f64 {
    let recent = &h2h_goals[..h2h_goals.len().min(H2H_WINDOW)];
    if recent.is_empty() {
        return 0.0;
    }
    f64::from(recent.iter().sum::<u32>()) / recent.len() as f64
}

pub fn is_defensive_league(league: &str, country: &str) -> bool {
    let league = league.to_lowercase();
    let country = country.to_lowercase();
    DEFENSIVE_LEAGUES
        .iter()
        .any(|d| league.contains(d) || country.contains(d))
}

pub fn risk_alerts(input: &OutlookInput) -> Vec<RiskAlert> {
    let mut alerts = Vec::new();

    let home_rate = input.home.failed_to_score_rate();
    let away_rate = input.away.failed_to_score_rate();
    if home_rate > FAILED_TO_SCORE_MAX {
        alerts.push(RiskAlert::HomeFailsToScore(home_rate));
    }
    if away_rate > FAILED_TO_SCORE_MAX {
        alerts.push(RiskAlert::AwayFailsToScore(away_rate));
    }
    if is_defensive_league(&input.league, &input.country) {
        alerts.push(RiskAlert::DefensiveLeague(input.country.clone()));
    }
    if input.away.form_strength() - input.home.form_strength() > BIG_TEAM_GAP {
        alerts.push(RiskAlert::BigTeamAway);
    }

    alerts
}

pub fn analyze(input: &OutlookInput) -> GoalOutlook {
    let expected = expected_goals(&input.home, &input.away);
    let h2h_avg = h2h_average(&input.h2h_goals);
    let alerts = risk_alerts(input);

    // Defensive leagues need a wider margin before Over 2.5 counts as safe.
    let safe_line = if is_defensive_league(&input.league, &input.country) {
        OVER_25_SAFE_DEFENSIVE
    } else {
        OVER_25_SAFE
    };
    let over_25 = if expected >= safe_line {
        Over25Verdict::VerySafe
    } else if expected >= OVER_25_MODERATE {
        if alerts.is_empty() && h2h_avg >= H2H_MIN_GOALS {
            Over25Verdict::Moderate
        } else {
            Over25Verdict::Risky
        }
    } else {
        Over25Verdict::Avoid
    };

    let over_15_probability = if expected >= OVER_15_SAFE {
        77
    } else if expected >= OVER_15_MIN {
        65
    } else {
        50
    };

    GoalOutlook {
        expected_goals: expected,
        h2h_avg: round2(h2h_avg),
        home_fts_rate: round1(input.home.failed_to_score_rate() * 100.0),
        away_fts_rate: round1(input.away.failed_to_score_rate() * 100.0),
        alerts,
        over_25,
        over_25_probability: over_25.probability(),
        over_15: expected >= OVER_15_MIN,
        over_15_probability,
    }
}

/// Outlooks at or above `min_expected`, highest expected goals first.
pub fn rank_by_expected<'a, T>(
    items: &'a [T],
    min_expected: f64,
    outlook: impl Fn(&T) -> &GoalOutlook,
) -> Vec<&'a T> {
    let mut ranked: Vec<&'a T> = items
        .iter()
        .filter(|item| outlook(*item).expected_goals >= min_expected)
        .collect();
    ranked.sort_by(|a, b| {
        outlook(*b)
            .expected_goals
            .total_cmp(&outlook(*a).expected_goals)
    });
    ranked
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ticket<'a, T> {
    pub legs: Vec<&'a T>,
    pub combined_probability: f64,
    pub estimated_odds: f64,
}

/// Up to eight very-safe Over 2.5 legs, combined as independent events.
pub fn safe_ticket<'a, T>(
    ranked: &[&'a T],
    outlook: impl Fn(&T) -> &GoalOutlook,
) -> Option<Ticket<'a, T>> {
    let legs: Vec<&'a T> = ranked
        .iter()
        .copied()
        .filter(|item| outlook(*item).over_25 == Over25Verdict::VerySafe)
        .take(TICKET_LEGS)
        .collect();
    if legs.is_empty() {
        return None;
    }
    let combined_probability = legs
        .iter()
        .map(|item| f64::from(outlook(*item).over_25_probability) / 100.0)
        .product::<f64>();
    Some(Ticket {
        legs,
        combined_probability,
        estimated_odds: 1.0 / combined_probability,
    })
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
