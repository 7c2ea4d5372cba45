use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use fixture_picks::classifier::{ClassifierInput, classify};
use fixture_picks::config::PicksConfig;
use fixture_picks::predictions::parse_prediction_json;

#[derive(Debug, serde::Deserialize)]
struct ClassifyCase {
    home: String,
    away: String,
    /// Raw `/predictions` response body as returned by the API.
    prediction: serde_json::Value,
}

fn main() -> anyhow::Result<()> {
    fixture_picks::init_runtime();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("tests/fixtures/classify_case.json"));

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let case: ClassifyCase = serde_json::from_str(&raw).context("invalid case json")?;
    let cfg = PicksConfig::from_env();

    // Offline only: no network, the payload comes from the case file.
    let Some(payload) = parse_prediction_json(&case.prediction.to_string())? else {
        println!("No prediction in case file");
        return Ok(());
    };

    let result = classify(
        &ClassifierInput {
            probabilities: &payload.probabilities,
            home_team: &case.home,
            away_team: &case.away,
            goals: &payload.goals,
            home_stats: payload.home_stats.as_ref(),
            away_stats: payload.away_stats.as_ref(),
        },
        &cfg.big_clubs,
    );

    println!("{} vs {}", case.home, case.away);
    println!(
        "1X2: {} / {} / {}",
        payload.probabilities.home, payload.probabilities.draw, payload.probabilities.away
    );
    println!("Pick: {} ({})", result.prediction.code(), result.prediction_text);
    println!("Confidence: {}", result.confidence);
    println!("Over/Under: {}", result.over_under);
    println!("BTTS: {}", result.btts);
    println!("Exact score: {}", result.exact_score);

    Ok(())
}
