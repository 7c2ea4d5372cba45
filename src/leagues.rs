pub const PRIORITY_LEAGUES: &[(u32, &str)] = &[
    (39, "Premier League"),
    (140, "La Liga"),
    (135, "Serie A"),
    (78, "Bundesliga"),
    (61, "Ligue 1"),
    (2, "Champions League"),
    (3, "Europa League"),
    (848, "Conference League"),
    (262, "Liga MX"),
    (94, "Primeira Liga"),
    (88, "Eredivisie"),
    (90, "KNVB Beker"),
    (144, "Jupiler Pro"),
    (203, "Super Lig"),
    (206, "Türkiye Kupası"),
    (179, "Scottish Prem"),
    (197, "Super League"),
    (307, "Saudi Pro League"),
    (305, "Qatar Stars"),
    (301, "UAE Pro League"),
    (330, "Kuwait Premier"),
    (417, "Bahrain Premier"),
    (895, "Egypt Cup"),
    (233, "Egypt Premier"),
    (1, "World Cup"),
    (4, "Euro"),
    (5, "Nations League"),
    (6, "Coupe de France"),
    (9, "Copa America"),
    (10, "Friendlies"),
];

pub const LEAGUE_KEYWORDS: &[&str] = &[
    "Serie A",
    "Liga",
    "Premier",
    "Bundesliga",
    "Ligue 1",
    "Champions",
    "Europa",
    "Cup",
    "Copa",
    "Coupe",
];

pub fn priority_league_label(league_id: u32) -> Option<&'static str> {
    PRIORITY_LEAGUES
        .iter()
        .find(|(id, _)| *id == league_id)
        .map(|(_, name)| *name)
}

pub fn is_priority_league(league_id: u32, league_name: &str) -> bool {
    priority_league_label(league_id).is_some()
        || LEAGUE_KEYWORDS.iter().any(|kw| league_name.contains(kw))
}
