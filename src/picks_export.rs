use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::goal_outlook::{rank_by_expected, safe_ticket};
use crate::picks::{Pick, PicksReport};

pub struct ExportReport {
    pub rows: usize,
}

const HEADER: [&str; 19] = [
    "Fixture ID",
    "Time",
    "League",
    "Country",
    "Home",
    "Away",
    "Home %",
    "Draw %",
    "Away %",
    "Pick",
    "Pick Text",
    "Confidence",
    "Over/Under",
    "BTTS",
    "Exact Score",
    "Expected Goals",
    "Over 2.5",
    "Over 2.5 %",
    "Alerts",
];

pub fn export_picks_xlsx(path: &Path, report: &PicksReport) -> Result<ExportReport> {
    let mut rows = vec![HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
    rows.extend(report.predictions.iter().map(pick_row));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Picks")
        .context("name picks worksheet")?;
    write_rows(worksheet, &rows)?;

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        rows: report.predictions.len(),
    })
}

pub fn picks_json(report: &PicksReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("serialize picks")
}

pub fn render_table(report: &PicksReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Picks for {} ({} matches)", report.date, report.total_matches);
    if report.predictions.is_empty() {
        out.push_str("No predictions available\n");
        return out;
    }
    let _ = writeln!(
        out,
        "{:<5} {:<22} {:<38} {:<4} {:<4} {:<10} {:<4} {:<5}",
        "TIME", "LEAGUE", "MATCH", "PICK", "CONF", "O/U", "BTTS", "SCORE"
    );
    for pick in &report.predictions {
        let matchup = format!("{} - {}", pick.home, pick.away);
        let _ = writeln!(
            out,
            "{:<5} {:<22} {:<38} {:<4} {:<4} {:<10} {:<4} {:<5}",
            pick.time,
            clip(&league_label(pick), 22),
            clip(&matchup, 38),
            pick.prediction.code(),
            stars(pick.confidence),
            pick.over_under,
            pick.btts,
            pick.exact_score,
        );
    }
    out
}

/// Over 2.5 ranking: fixtures at or above `min_expected`, most goals first, then
/// the combined ticket of the very safe legs.
pub fn render_goals_table(report: &PicksReport, min_expected: f64) -> String {
    let mut out = String::new();
    let ranked = rank_by_expected(&report.predictions, min_expected, |p: &Pick| &p.goals);
    let _ = writeln!(
        out,
        "Goals outlook for {} ({} of {} matches at xG >= {:.1})",
        report.date,
        ranked.len(),
        report.total_matches,
        min_expected
    );
    if ranked.is_empty() {
        out.push_str("No match clears the expected-goals line\n");
        return out;
    }
    let _ = writeln!(
        out,
        "{:<5} {:<22} {:<38} {:>5} {:>5} {:<9} {:>4} {:<3} {:>4}  ALERTS",
        "TIME", "LEAGUE", "MATCH", "XG", "H2H", "O2.5", "%", "BET", "O1.5"
    );
    for pick in &ranked {
        let matchup = format!("{} - {}", pick.home, pick.away);
        let _ = writeln!(
            out,
            "{:<5} {:<22} {:<38} {:>5.2} {:>5.1} {:<9} {:>4} {:<3} {:>4}  {}",
            pick.time,
            clip(&league_label(pick), 22),
            clip(&matchup, 38),
            pick.goals.expected_goals,
            pick.goals.h2h_avg,
            pick.goals.over_25.label(),
            pick.goals.over_25_probability,
            if pick.goals.over_25.recommended() { "oui" } else { "non" },
            pick.goals.over_15_probability,
            alert_text(pick),
        );
    }

    match safe_ticket(&ranked, |p: &Pick| &p.goals) {
        Some(ticket) => {
            let _ = writeln!(
                out,
                "Ticket Over 2.5: {} legs, combined {:.1}%, odds ~{:.2}",
                ticket.legs.len(),
                ticket.combined_probability * 100.0,
                ticket.estimated_odds
            );
        }
        None => out.push_str("Ticket Over 2.5: no very safe leg\n"),
    }
    out
}

fn league_label(pick: &Pick) -> String {
    if pick.country.is_empty() {
        pick.league.clone()
    } else {
        format!("{} ({})", pick.league, pick.country)
    }
}

fn stars(confidence: u8) -> String {
    "*".repeat(confidence as usize)
}

fn clip(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(width.saturating_sub(1)).collect();
    clipped.push('~');
    clipped
}

fn pick_row(pick: &Pick) -> Vec<String> {
    vec![
        pick.id.to_string(),
        pick.time.clone(),
        pick.league.clone(),
        pick.country.clone(),
        pick.home.clone(),
        pick.away.clone(),
        pick.home_pct.clone(),
        pick.draw_pct.clone(),
        pick.away_pct.clone(),
        pick.prediction.code().to_string(),
        pick.prediction_text.clone(),
        pick.confidence.to_string(),
        pick.over_under.to_string(),
        pick.btts.to_string(),
        pick.exact_score.clone(),
        format!("{:.2}", pick.goals.expected_goals),
        pick.goals.over_25.label().to_string(),
        pick.goals.over_25_probability.to_string(),
        alert_text(pick),
    ]
}

fn alert_text(pick: &Pick) -> String {
    pick.goals
        .alerts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
