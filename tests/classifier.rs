use fixture_picks::classifier::{
    BTTS_NO, BTTS_YES, BigClubs, ClassifierInput, GoalAverages, GoalsEstimate, OVER_2_5,
    Outcome, OutcomeProbabilities, TeamGoalStats, UNDER_2_5, UNDER_3_5, both_teams_score,
    classify, confidence_tier, determine_outcome, exact_score, over_under,
};

fn probs(home: i32, draw: i32, away: i32) -> OutcomeProbabilities {
    OutcomeProbabilities::new(format!("{home}%"), format!("{draw}%"), format!("{away}%"))
}

fn outcome(home: i32, draw: i32, away: i32, home_team: &str) -> Outcome {
    determine_outcome(&probs(home, draw, away), home_team, "Visitors", &BigClubs::default()).0
}

fn scoring(home_avg: Option<f64>, away_avg: Option<f64>) -> TeamGoalStats {
    TeamGoalStats {
        goals_for: GoalAverages {
            total: None,
            home: home_avg,
            away: away_avg,
        },
        goals_against: GoalAverages::default(),
    }
}

fn totals(for_total: f64, against_total: f64) -> TeamGoalStats {
    TeamGoalStats {
        goals_for: GoalAverages {
            total: Some(for_total),
            ..GoalAverages::default()
        },
        goals_against: GoalAverages {
            total: Some(against_total),
            ..GoalAverages::default()
        },
    }
}

#[test]
fn away_share_above_ten_blocks_outright_home_pick() {
    let p = OutcomeProbabilities::new("50%", "30%", "20%");
    let (pick, text) = determine_outcome(&p, "Arsenal", "Chelsea", &BigClubs::default());
    // away 20 > 10 so no outright pick; 50 vs 20 still leans home
    assert_eq!(pick, Outcome::HomeOrDraw);
    assert_eq!(text, "DC Arsenal");
    assert_eq!(confidence_tier(&p), 4);
}

#[test]
fn home_win_example_with_low_away_share() {
    let p = OutcomeProbabilities::new("50%", "40%", "10%");
    let (pick, text) = determine_outcome(&p, "Arsenal", "Chelsea", &BigClubs::default());
    assert_eq!(pick, Outcome::Home);
    assert_eq!(text, "Arsenal gagne");
    assert_eq!(confidence_tier(&p), 4);
}

#[test]
fn rule_one_holds_across_its_whole_region() {
    for home in 45..=100 {
        for away in 0..=10 {
            assert_eq!(outcome(home, 100 - home - away, away, "Anyone"), Outcome::Home);
        }
    }
}

#[test]
fn big_club_at_home_is_never_tipped_to_lose() {
    let p = OutcomeProbabilities::new("8%", "22%", "70%");
    let (pick, text) = determine_outcome(&p, "Al Ahly", "Visitors", &BigClubs::default());
    assert_eq!(pick, Outcome::HomeOrDraw);
    assert_eq!(text, "DC Al Ahly");

    for home in 0..=10 {
        for away in 45..=90 {
            assert_eq!(outcome(home, 10, away, "Zamalek SC"), Outcome::HomeOrDraw);
            assert_eq!(outcome(home, 10, away, "Pyramids FC"), Outcome::HomeOrDraw);
        }
    }
}

#[test]
fn ordinary_home_side_gets_away_win() {
    let p = OutcomeProbabilities::new("8%", "22%", "70%");
    let (pick, text) = determine_outcome(&p, "Smouha", "Al Ahly", &BigClubs::default());
    assert_eq!(pick, Outcome::Away);
    assert_eq!(text, "Al Ahly gagne");
}

#[test]
fn big_club_list_is_injectable() {
    let clubs = BigClubs::new(["Celtic"]);
    let p = OutcomeProbabilities::new("5%", "20%", "75%");
    assert_eq!(determine_outcome(&p, "Celtic", "Rangers", &clubs).0, Outcome::HomeOrDraw);
    assert_eq!(determine_outcome(&p, "Al Ahly", "Rangers", &clubs).0, Outcome::Away);
    assert_eq!(
        determine_outcome(&p, "Al Ahly", "Rangers", &BigClubs::empty()).0,
        Outcome::Away
    );
}

#[test]
fn home_or_draw_is_checked_before_draw_or_away() {
    let p = OutcomeProbabilities::new("38%", "38%", "24%");
    let (pick, text) = determine_outcome(&p, "Lens", "Lille", &BigClubs::default());
    assert_eq!(pick, Outcome::HomeOrDraw);
    assert_eq!(text, "DC Lens");

    // all three rules overlap: 1X wins
    assert_eq!(outcome(35, 35, 35, "Anyone"), Outcome::HomeOrDraw);
}

#[test]
fn draw_or_away_and_pure_draw_rules() {
    let (pick, text) =
        determine_outcome(&probs(20, 38, 42), "Lens", "Lille", &BigClubs::default());
    assert_eq!(pick, Outcome::DrawOrAway);
    assert_eq!(text, "DC Lille");

    let (pick, text) =
        determine_outcome(&probs(30, 40, 30), "Lens", "Lille", &BigClubs::default());
    assert_eq!(pick, Outcome::Draw);
    assert_eq!(text, "Match Nul probable");
}

#[test]
fn fallback_leans_to_the_stronger_side() {
    assert_eq!(outcome(34, 30, 33, "Anyone"), Outcome::HomeOrDraw);
    assert_eq!(outcome(30, 30, 40, "Anyone"), Outcome::DrawOrAway);
    assert_eq!(outcome(33, 34, 33, "Anyone"), Outcome::DrawOrAway);
}

#[test]
fn malformed_percentages_default_to_draw() {
    let p = OutcomeProbabilities::new("abc%", "30%", "20%");
    let (pick, text) = determine_outcome(&p, "Arsenal", "Chelsea", &BigClubs::default());
    assert_eq!(pick, Outcome::Draw);
    assert_eq!(text, "Match Nul");
    assert_eq!(confidence_tier(&p), 2);
}

#[test]
fn confidence_steps_only_at_45_and_50() {
    let mut previous = confidence_tier(&probs(0, 0, 0));
    assert_eq!(previous, 2);
    for max in 1..=100 {
        let tier = confidence_tier(&probs(0, max, 0));
        if max == 45 || max == 50 {
            assert_eq!(tier, previous + 1, "expected a step at {max}");
        } else {
            assert_eq!(tier, previous, "unexpected step at {max}");
        }
        previous = tier;
    }
    assert_eq!(confidence_tier(&probs(44, 10, 46)), 3);
}

#[test]
fn over_under_prefers_goal_estimates() {
    let goals = GoalsEstimate {
        home: Some("-3.5".to_string()),
        away: Some("-1.5".to_string()),
        advice: Some("Combo Double chance : draw or away and -2.5 goals".to_string()),
    };
    assert_eq!(over_under(&goals), OVER_2_5);

    let goals = GoalsEstimate {
        home: Some("-1.5".to_string()),
        away: Some("-2.5".to_string()),
        advice: None,
    };
    assert_eq!(over_under(&goals), UNDER_3_5);

    let one_sided = GoalsEstimate {
        home: None,
        away: Some("-2.5".to_string()),
        advice: None,
    };
    assert_eq!(over_under(&one_sided), UNDER_3_5);
}

#[test]
fn over_under_falls_back_to_advice() {
    let goals = GoalsEstimate {
        home: Some("-1.5".to_string()),
        away: Some("-1.5".to_string()),
        advice: Some("Combo Winner : Arsenal and +2.5 goals".to_string()),
    };
    assert_eq!(over_under(&goals), OVER_2_5);

    let goals = GoalsEstimate {
        home: None,
        away: None,
        advice: Some("Double chance : draw or Chelsea and -3.5 goals".to_string()),
    };
    assert_eq!(over_under(&goals), UNDER_2_5);

    assert_eq!(over_under(&GoalsEstimate::default()), UNDER_2_5);
}

#[test]
fn btts_rules_in_priority_order() {
    let open = totals(1.4, 1.1);
    assert_eq!(both_teams_score(Some(&open), Some(&open)), BTTS_YES);

    let mean_defense = totals(2.4, 0.3);
    assert_eq!(both_teams_score(Some(&mean_defense), Some(&open)), BTTS_NO);
    assert_eq!(both_teams_score(Some(&open), Some(&mean_defense)), BTTS_NO);

    let firing = totals(1.3, 0.7);
    assert_eq!(both_teams_score(Some(&firing), Some(&firing)), BTTS_YES);

    let blunt = totals(0.9, 0.7);
    assert_eq!(both_teams_score(Some(&blunt), Some(&firing)), BTTS_NO);

    assert_eq!(both_teams_score(None, None), BTTS_NO);
    assert_eq!(both_teams_score(Some(&open), None), BTTS_NO);
}

#[test]
fn exact_score_follows_the_pick() {
    let home = scoring(Some(1.6), None);
    let away = scoring(None, Some(1.4));

    // 2-1 already agrees with a home pick
    assert_eq!(exact_score(Outcome::Home, Some(&home), Some(&away)), "2-1");
    assert_eq!(exact_score(Outcome::HomeOrDraw, Some(&home), Some(&away)), "2-1");
    // away pick lifts away goals above home goals
    assert_eq!(exact_score(Outcome::Away, Some(&home), Some(&away)), "2-3");
    assert_eq!(exact_score(Outcome::DrawOrAway, Some(&home), Some(&away)), "2-3");
    // draw levels the away side to the home side
    assert_eq!(exact_score(Outcome::Draw, Some(&home), Some(&away)), "2-2");
}

#[test]
fn exact_score_defaults_without_stats() {
    // 1.2 -> 1, 0.9 -> 1
    assert_eq!(exact_score(Outcome::Home, None, None), "2-1");
    assert_eq!(exact_score(Outcome::Away, None, None), "1-2");
    assert_eq!(exact_score(Outcome::Draw, None, None), "1-1");
}

#[test]
fn exact_score_respects_asymmetric_caps() {
    let averages = [
        None,
        Some(-3.0),
        Some(0.0),
        Some(0.49),
        Some(2.5),
        Some(3.6),
        Some(7.0),
        Some(1e9),
        Some(f64::INFINITY),
    ];
    let outcomes = [
        Outcome::Home,
        Outcome::Away,
        Outcome::Draw,
        Outcome::HomeOrDraw,
        Outcome::DrawOrAway,
    ];
    for home_avg in averages {
        for away_avg in averages {
            for pick in outcomes {
                let home = scoring(home_avg, None);
                let away = scoring(None, away_avg);
                let score = exact_score(pick, Some(&home), Some(&away));
                let (h, a) = score.split_once('-').expect("score has a dash");
                let h: i64 = h.parse().expect("home goals");
                let a: i64 = a.parse().expect("away goals");
                assert!((0..=4).contains(&h), "{score} home out of range");
                assert!((0..=3).contains(&a), "{score} away out of range");
            }
        }
    }
}

#[test]
fn classify_assembles_every_field() {
    let p = OutcomeProbabilities::new("8%", "22%", "70%");
    let goals = GoalsEstimate {
        home: Some("-1.5".to_string()),
        away: Some("-3.5".to_string()),
        advice: Some("Winner : Visitors".to_string()),
    };
    let home = totals(1.1, 1.2);
    let away = totals(2.2, 0.9);
    let input = ClassifierInput {
        probabilities: &p,
        home_team: "Al Ahly",
        away_team: "Visitors",
        goals: &goals,
        home_stats: Some(&home),
        away_stats: Some(&away),
    };
    let result = classify(&input, &BigClubs::default());
    assert_eq!(result.prediction, Outcome::HomeOrDraw);
    assert_eq!(result.prediction_text, "DC Al Ahly");
    assert_eq!(result.confidence, 4);
    assert_eq!(result.over_under, OVER_2_5);
    assert_eq!(result.btts, BTTS_YES);
    // no home/away splits: defaults 1 and 1, home pick forces 2-1
    assert_eq!(result.exact_score, "2-1");

    let json = serde_json::to_value(&result).expect("serializable");
    assert_eq!(json["prediction"], "1X");
    assert_eq!(json["exact_score"], "2-1");
}
