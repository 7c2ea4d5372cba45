use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::classifier::{GoalAverages, GoalsEstimate, OutcomeProbabilities, TeamGoalStats};
use crate::config::PicksConfig;
use crate::goal_outlook::{OutlookInput, TeamRecord};
use crate::http_client::{api_error_message, get_api_json};

// Upstream omits a side's percentage occasionally; treat it as an even split.
const MISSING_PERCENT: &str = "33%";

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPayload {
    pub probabilities: OutcomeProbabilities,
    pub goals: GoalsEstimate,
    pub home_stats: Option<TeamGoalStats>,
    pub away_stats: Option<TeamGoalStats>,
    pub outlook: OutlookInput,
}

pub fn fetch_prediction(cfg: &PicksConfig, fixture_id: u64) -> Result<Option<PredictionPayload>> {
    let id = fixture_id.to_string();
    let body = get_api_json(cfg, "predictions", &[("fixture", id.as_str())])
        .with_context(|| format!("prediction fetch failed for fixture {fixture_id}"))?;
    parse_prediction_json(&body)
}

#[derive(Debug, Deserialize)]
struct PredictionEnvelope {
    #[serde(default)]
    errors: Value,
    #[serde(default)]
    response: Vec<Value>,
}

pub fn parse_prediction_json(raw: &str) -> Result<Option<PredictionPayload>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(None);
    }
    let envelope: PredictionEnvelope =
        serde_json::from_str(trimmed).context("invalid predictions json")?;
    if let Some(msg) = api_error_message(&envelope.errors) {
        return Err(anyhow::anyhow!("predictions api error: {msg}"));
    }

    let Some(entry) = envelope.response.first() else {
        return Ok(None);
    };
    if entry.as_object().is_none_or(|o| o.is_empty()) {
        return Ok(None);
    }
    Ok(Some(payload_from_entry(entry)))
}

pub fn payload_from_entry(entry: &Value) -> PredictionPayload {
    let predictions = entry.get("predictions").unwrap_or(&Value::Null);
    let percent = predictions.get("percent").unwrap_or(&Value::Null);
    let goals = predictions.get("goals").unwrap_or(&Value::Null);

    let probabilities = OutcomeProbabilities::new(
        percent_text(percent, "home"),
        percent_text(percent, "draw"),
        percent_text(percent, "away"),
    );

    let goals = GoalsEstimate {
        home: pick_text(goals, "home"),
        away: pick_text(goals, "away"),
        advice: pick_text(predictions, "advice"),
    };

    let teams = entry.get("teams").unwrap_or(&Value::Null);
    let league = entry.get("league").unwrap_or(&Value::Null);
    PredictionPayload {
        probabilities,
        goals,
        home_stats: team_goal_stats(teams.get("home")),
        away_stats: team_goal_stats(teams.get("away")),
        outlook: OutlookInput {
            league: pick_text(league, "name").unwrap_or_default(),
            country: pick_text(league, "country").unwrap_or_default(),
            home: team_record(teams.get("home")),
            away: team_record(teams.get("away")),
            h2h_goals: h2h_goals(entry.get("h2h")),
        },
    }
}

/// Only an absent key gets the even-split default. Strings pass through as-is;
/// any other present value (null, a bare number) becomes empty, which the
/// classifier reads as malformed.
fn percent_text(percent: &Value, key: &str) -> String {
    match percent.get(key) {
        None => MISSING_PERCENT.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(_) => String::new(),
    }
}

fn team_record(team: Option<&Value>) -> TeamRecord {
    let Some(league) = team.and_then(|t| t.get("league")) else {
        return TeamRecord::default();
    };
    let average = |side: &str| {
        league
            .pointer(&format!("/goals/{side}/average/total"))
            .and_then(value_f64)
            .unwrap_or(0.0)
    };
    let count = |path: &str| {
        league
            .pointer(path)
            .and_then(Value::as_u64)
            .and_then(|n| u32::try_from(n).ok())
    };
    TeamRecord {
        goals_for: average("for"),
        goals_against: average("against"),
        failed_to_score: count("/failed_to_score/total").unwrap_or(0),
        played: count("/fixtures/played/total"),
        form: pick_text(league, "form").unwrap_or_default(),
    }
}

fn h2h_goals(h2h: Option<&Value>) -> Vec<u32> {
    let Some(matches) = h2h.and_then(Value::as_array) else {
        return Vec::new();
    };
    matches
        .iter()
        .map(|m| {
            let side = |key: &str| {
                m.pointer(&format!("/goals/{key}"))
                    .and_then(Value::as_u64)
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or(0)
            };
            side("home") + side("away")
        })
        .collect()
}

fn team_goal_stats(team: Option<&Value>) -> Option<TeamGoalStats> {
    let goals = team?.get("league")?.get("goals")?;
    if !goals.is_object() {
        return None;
    }
    Some(TeamGoalStats {
        goals_for: goal_averages(goals.get("for")),
        goals_against: goal_averages(goals.get("against")),
    })
}

fn goal_averages(side: Option<&Value>) -> GoalAverages {
    let avg = side.and_then(|s| s.get("average"));
    let field = |key: &str| avg.and_then(|a| a.get(key)).and_then(value_f64);
    GoalAverages {
        total: field("total"),
        home: field("home"),
        away: field("away"),
    }
}

/// Averages come back as strings ("1.5") but numbers are accepted too.
fn value_f64(v: &Value) -> Option<f64> {
    let parsed = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

fn pick_text(v: &Value, key: &str) -> Option<String> {
    match v.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
