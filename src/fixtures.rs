use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::PicksConfig;
use crate::http_client::{api_error_message, get_api_json};
use crate::leagues::is_priority_league;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixtureInfo {
    pub id: u64,
    pub kickoff: String,
    pub time: String,
    pub league_id: u32,
    pub league: String,
    pub country: Option<String>,
    pub home: String,
    pub away: String,
}

pub fn fetch_fixtures(cfg: &PicksConfig, date: &str) -> Result<Vec<FixtureInfo>> {
    let body = get_api_json(cfg, "fixtures", &[("date", date)]).context("fixtures fetch failed")?;
    let fixtures = parse_fixtures_json(&body)?;
    info!(date, count = fixtures.len(), "fixtures received");
    Ok(fixtures)
}

#[derive(Debug, Deserialize)]
struct FixturesEnvelope {
    #[serde(default)]
    errors: Value,
    #[serde(default)]
    response: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiFixtureRow {
    fixture: ApiFixture,
    league: ApiLeague,
    teams: ApiTeams,
}

#[derive(Debug, Deserialize)]
struct ApiFixture {
    id: u64,
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiLeague {
    id: u32,
    name: String,
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiTeams {
    home: ApiTeam,
    away: ApiTeam,
}

#[derive(Debug, Deserialize)]
struct ApiTeam {
    name: String,
}

pub fn parse_fixtures_json(raw: &str) -> Result<Vec<FixtureInfo>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let envelope: FixturesEnvelope =
        serde_json::from_str(trimmed).context("invalid fixtures json")?;
    if let Some(msg) = api_error_message(&envelope.errors) {
        return Err(anyhow::anyhow!("fixtures api error: {msg}"));
    }

    let mut out = Vec::with_capacity(envelope.response.len());
    for row in envelope.response {
        match serde_json::from_value::<ApiFixtureRow>(row) {
            Ok(row) => out.push(fixture_from_row(row)),
            Err(err) => debug!(%err, "skipping uninterpretable fixture row"),
        }
    }
    Ok(out)
}

fn fixture_from_row(row: ApiFixtureRow) -> FixtureInfo {
    let kickoff = row.fixture.date.unwrap_or_default();
    FixtureInfo {
        id: row.fixture.id,
        time: kickoff_clock(&kickoff),
        kickoff,
        league_id: row.league.id,
        league: row.league.name,
        country: row.league.country.filter(|c| !c.trim().is_empty()),
        home: row.teams.home.name,
        away: row.teams.away.name,
    }
}

/// `2024-03-09T20:45:00+00:00` -> `20:45`.
pub fn kickoff_clock(kickoff: &str) -> String {
    kickoff.get(11..16).unwrap_or_default().to_string()
}

/// Priority filter (unless disabled), then cap, keeping upstream order.
pub fn select_fixtures(fixtures: Vec<FixtureInfo>, all_leagues: bool, cap: usize) -> Vec<FixtureInfo> {
    fixtures
        .into_iter()
        .filter(|f| all_leagues || is_priority_league(f.league_id, &f.league))
        .take(cap)
        .collect()
}
