use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{error, info};

use fixture_picks::config::PicksConfig;
use fixture_picks::goal_outlook::DEFAULT_MIN_EXPECTED;
use fixture_picks::picks::{fetch_picks_for_date, resolve_date};
use fixture_picks::picks_export::{
    export_picks_xlsx, picks_json, render_goals_table, render_table,
};

const USAGE: &str = "usage: fixture_picks [YYYY-MM-DD|today|tomorrow] [--json] [--goals] \
[--min-expected XG] [--xlsx PATH]";

#[derive(Debug, Default)]
struct CliArgs {
    date: Option<String>,
    json: bool,
    goals: bool,
    min_expected: Option<f64>,
    xlsx: Option<PathBuf>,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut out = CliArgs::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => out.json = true,
            "--goals" => out.goals = true,
            "--min-expected" => {
                let raw = args.next().context("--min-expected needs a number")?;
                let value: f64 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("invalid --min-expected {raw:?}"))?;
                if !value.is_finite() || value < 0.0 {
                    return Err(anyhow::anyhow!("--min-expected must be a non-negative number"));
                }
                out.min_expected = Some(value);
                out.goals = true;
            }
            "--xlsx" => {
                let path = args.next().context("--xlsx needs a path")?;
                out.xlsx = Some(PathBuf::from(path));
            }
            "-h" | "--help" => out.help = true,
            flag if flag.starts_with("--") => {
                return Err(anyhow::anyhow!("unknown flag {flag}"));
            }
            _ if out.date.is_none() => out.date = Some(arg),
            _ => return Err(anyhow::anyhow!("unexpected argument {arg}")),
        }
    }
    Ok(out)
}

fn run(args: CliArgs) -> Result<()> {
    let cfg = PicksConfig::from_env();
    let date = resolve_date(args.date.as_deref(), Local::now().date_naive())?;
    let report = fetch_picks_for_date(&cfg, date)?;

    if args.json {
        println!("{}", picks_json(&report)?);
    } else if args.goals {
        let min_expected = args.min_expected.unwrap_or(DEFAULT_MIN_EXPECTED);
        print!("{}", render_goals_table(&report, min_expected));
    } else {
        print!("{}", render_table(&report));
    }

    if let Some(path) = args.xlsx.as_deref() {
        let export = export_picks_xlsx(path, &report)?;
        info!(rows = export.rows, path = %path.display(), "picks exported");
    }
    Ok(())
}

fn main() -> ExitCode {
    fixture_picks::init_runtime();

    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("error: {err}\n{USAGE}");
            return ExitCode::from(2);
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
