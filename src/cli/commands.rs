use std::fmt::Write as _;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use crate::analytics::{self, AnalyticsOptions, WeekStart, WeeklySummary};
use crate::codec::{self, StyledText};
use crate::config::{AppConfig, MAX_LOOKBACK_DAYS, MAX_WEEKS_BACK};
use crate::model::{notes_from_json, Note};

#[derive(Args, Debug, Clone)]
pub struct EncodeArgs {
    /// Styled text JSON file. Reads stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Pretty-print the span list
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct DecodeArgs {
    /// Note JSON file. Reads stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Pretty-print the styled text
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct StatsArgs {
    /// JSON array of notes. Reads stdin when omitted.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Reference instant (RFC 3339). Defaults to the current UTC time.
    #[arg(long)]
    pub now: Option<String>,
    /// Number of trailing weeks to count
    #[arg(long)]
    pub weeks: Option<u32>,
    /// How far back, in days, to look for streaks
    #[arg(long)]
    pub lookback_days: Option<u32>,
    /// First day of the week (monday or sunday)
    #[arg(long)]
    pub week_start: Option<WeekStart>,
    /// Emit JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

pub fn encode(args: EncodeArgs) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    let output = run_encode(&raw, args.pretty)?;
    println!("{output}");
    Ok(())
}

pub fn decode(args: DecodeArgs) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    let output = run_decode(&raw, args.pretty)?;
    println!("{output}");
    Ok(())
}

pub fn stats(config: &AppConfig, args: StatsArgs) -> Result<()> {
    let raw = read_input(args.input.as_deref())?;
    let output = run_stats(config, &raw, &args)?;
    print!("{output}");
    Ok(())
}

fn run_encode(raw: &str, pretty: bool) -> Result<String> {
    let styled: StyledText = serde_json::from_str(raw).context("parsing styled text json")?;
    let spans = codec::encode(&styled);
    tracing::debug!(runs = styled.runs().len(), spans = spans.len(), "encoded styled text");
    to_json(&spans, pretty)
}

fn run_decode(raw: &str, pretty: bool) -> Result<String> {
    let note = Note::from_json(raw).context("parsing note json")?;
    let styled = codec::decode_note(&note);
    to_json(&styled, pretty)
}

fn run_stats(config: &AppConfig, raw: &str, args: &StatsArgs) -> Result<String> {
    let notes = notes_from_json(raw).context("parsing notes json")?;
    let now = match args.now.as_deref() {
        Some(value) => OffsetDateTime::parse(value, &Rfc3339)
            .with_context(|| format!("parsing --now value {value:?}"))?,
        None => OffsetDateTime::now_utc(),
    };
    let options = resolve_options(&config.analytics, args)?;
    let summary = analytics::summarize(&notes, now, &options);
    if args.json {
        to_json(&summary, true).map(|mut json| {
            json.push('\n');
            json
        })
    } else {
        Ok(format_summary(&summary))
    }
}

fn resolve_options(base: &AnalyticsOptions, args: &StatsArgs) -> Result<AnalyticsOptions> {
    let mut options = base.clone();
    if let Some(weeks) = args.weeks {
        if !(1..=MAX_WEEKS_BACK).contains(&weeks) {
            bail!("--weeks must be between 1 and {MAX_WEEKS_BACK}, got {weeks}");
        }
        options.weeks_back = weeks;
    }
    if let Some(days) = args.lookback_days {
        if days > MAX_LOOKBACK_DAYS {
            bail!("--lookback-days must be at most {MAX_LOOKBACK_DAYS}, got {days}");
        }
        options.lookback_days = days;
    }
    if let Some(week_start) = args.week_start {
        options.week_start = week_start;
    }
    Ok(options)
}

fn format_summary(summary: &WeeklySummary) -> String {
    let mut out = String::new();
    let _ = writeln!(&mut out, "{:<12}notes", "week of");
    for bucket in &summary.weeks {
        let _ = writeln!(&mut out, "{:<12}{}", bucket.week_label, bucket.count);
    }
    out.push('\n');
    let _ = writeln!(
        &mut out,
        "longest streak: {}",
        format_weeks(summary.longest_streak)
    );
    let _ = writeln!(
        &mut out,
        "current streak: {}",
        format_weeks(summary.current_streak)
    );
    if summary.pending_notes > 0 {
        let _ = writeln!(
            &mut out,
            "awaiting emotion scores: {}",
            summary.pending_notes
        );
    }
    out
}

fn format_weeks(count: u32) -> String {
    if count == 1 {
        "1 week".to_string()
    } else {
        format!("{count} weeks")
    }
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("serialising output json")
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading input {}", path.display()))
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("reading stdin")?;
            if buffer.trim().is_empty() {
                bail!("no input provided on stdin");
            }
            Ok(buffer)
        }
    }
}
