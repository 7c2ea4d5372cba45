use std::env;

use crate::classifier::BigClubs;

const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";
const DEFAULT_MAX_FIXTURES: usize = 25;
const DEFAULT_PARALLELISM: usize = 6;

#[derive(Debug, Clone)]
pub struct PicksConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_fixtures: usize,
    pub parallelism: usize,
    pub all_leagues: bool,
    pub big_clubs: BigClubs,
}

impl Default for PicksConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl PicksConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_key = lookup("API_SPORTS_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        let base_url = lookup("API_SPORTS_BASE_URL")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let max_fixtures = lookup("PICKS_MAX_FIXTURES")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_FIXTURES)
            .clamp(1, 100);
        let parallelism = lookup("FETCH_PARALLELISM")
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_PARALLELISM)
            .clamp(2, 32);
        let all_leagues = parse_bool(lookup("PICKS_ALL_LEAGUES").as_deref(), false);
        let big_clubs = lookup("BIG_CLUBS")
            .map(|raw| BigClubs::new(raw.split(',')))
            .filter(|clubs| !clubs.is_empty())
            .unwrap_or_default();

        Self {
            api_key,
            base_url,
            max_fixtures,
            parallelism,
            all_leagues,
            big_clubs,
        }
    }

    pub fn require_api_key(&self) -> anyhow::Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("API_SPORTS_KEY missing"))
    }
}

fn parse_bool(raw: Option<&str>, default: bool) -> bool {
    let Some(raw) = raw else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
