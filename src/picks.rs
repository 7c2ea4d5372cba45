use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classifier::{BigClubs, ClassifierInput, Outcome, classify};
use crate::config::PicksConfig;
use crate::fixtures::{FixtureInfo, fetch_fixtures, select_fixtures};
use crate::goal_outlook::{GoalOutlook, analyze};
use crate::predictions::{PredictionPayload, fetch_prediction};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One classified fixture, flat so the renderer can use it as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Pick {
    pub id: u64,
    pub time: String,
    pub league: String,
    pub country: String,
    pub home: String,
    pub away: String,
    pub home_pct: String,
    pub draw_pct: String,
    pub away_pct: String,
    pub prediction: Outcome,
    pub prediction_text: String,
    pub over_under: &'static str,
    pub btts: &'static str,
    pub exact_score: String,
    pub confidence: u8,
    pub advice: String,
    pub goals: GoalOutlook,
}

#[derive(Debug, Clone, Serialize)]
pub struct PicksReport {
    pub date: String,
    pub total_matches: usize,
    pub predictions: Vec<Pick>,
}

impl PicksReport {
    pub fn new(date: NaiveDate, predictions: Vec<Pick>) -> Self {
        Self {
            date: date.format(DATE_FORMAT).to_string(),
            total_matches: predictions.len(),
            predictions,
        }
    }
}

pub fn build_pick(fixture: &FixtureInfo, payload: &PredictionPayload, big_clubs: &BigClubs) -> Pick {
    let input = ClassifierInput {
        probabilities: &payload.probabilities,
        home_team: &fixture.home,
        away_team: &fixture.away,
        goals: &payload.goals,
        home_stats: payload.home_stats.as_ref(),
        away_stats: payload.away_stats.as_ref(),
    };
    let result = classify(&input, big_clubs);

    Pick {
        id: fixture.id,
        time: fixture.time.clone(),
        league: fixture.league.clone(),
        country: fixture
            .country
            .clone()
            .unwrap_or_else(|| payload.outlook.country.clone()),
        home: fixture.home.clone(),
        away: fixture.away.clone(),
        home_pct: payload.probabilities.home.clone(),
        draw_pct: payload.probabilities.draw.clone(),
        away_pct: payload.probabilities.away.clone(),
        prediction: result.prediction,
        prediction_text: result.prediction_text,
        over_under: result.over_under,
        btts: result.btts,
        exact_score: result.exact_score,
        confidence: result.confidence,
        advice: payload.goals.advice.clone().unwrap_or_default(),
        goals: analyze(&payload.outlook),
    }
}

/// Fetches and classifies every fixture on a bounded pool. Fixtures whose fetch fails
/// or returns nothing are dropped; the rest come back ordered by kickoff clock.
pub fn collect_picks<F>(fixtures: &[FixtureInfo], cfg: &PicksConfig, fetch: F) -> Vec<Pick>
where
    F: Fn(&FixtureInfo) -> Result<Option<PredictionPayload>> + Sync,
{
    let pool = build_fetch_pool(cfg.parallelism);
    let mut picks: Vec<Pick> = with_fetch_pool(&pool, || {
        fixtures
            .par_iter()
            .filter_map(|fixture| match fetch(fixture) {
                Ok(Some(payload)) => Some(build_pick(fixture, &payload, &cfg.big_clubs)),
                Ok(None) => {
                    debug!(fixture_id = fixture.id, "no prediction available");
                    None
                }
                Err(err) => {
                    warn!(fixture_id = fixture.id, "dropping fixture: {err:#}");
                    None
                }
            })
            .collect()
    });

    picks.sort_by(|a, b| a.time.cmp(&b.time));
    picks
}

pub fn fetch_picks_for_date(cfg: &PicksConfig, date: NaiveDate) -> Result<PicksReport> {
    let day = date.format(DATE_FORMAT).to_string();
    let fixtures = fetch_fixtures(cfg, &day)?;
    let selected = select_fixtures(fixtures, cfg.all_leagues, cfg.max_fixtures);
    info!(date = %day, selected = selected.len(), "fetching predictions");

    let picks = collect_picks(&selected, cfg, |fixture| fetch_prediction(cfg, fixture.id));
    info!(date = %day, picks = picks.len(), "picks ready");
    Ok(PicksReport::new(date, picks))
}

/// Accepts `YYYY-MM-DD`, `today` or `tomorrow`; no argument means today.
pub fn resolve_date(arg: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    let Some(raw) = arg.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(today);
    };
    match raw.to_ascii_lowercase().as_str() {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        _ => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .with_context(|| format!("invalid date {raw:?}, expected YYYY-MM-DD")),
    }
}

fn build_fetch_pool(threads: usize) -> Option<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|idx| format!("picks-fetch-{idx}"))
        .build()
        .ok()
}

fn with_fetch_pool<T>(pool: &Option<rayon::ThreadPool>, action: impl FnOnce() -> T + Send) -> T
where
    T: Send,
{
    if let Some(pool) = pool.as_ref() {
        pool.install(action)
    } else {
        action()
    }
}
