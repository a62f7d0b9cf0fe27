use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use time::{Date, Duration, OffsetDateTime};

use crate::model::Note;

pub const DEFAULT_WEEKS_BACK: u32 = 5;
pub const DEFAULT_LOOKBACK_DAYS: u32 = 365;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum WeekStart {
    Monday,
    #[default]
    Sunday,
}

impl WeekStart {
    /// First day of the week containing `date`.
    pub fn week_of(self, date: Date) -> Date {
        let days_in = match self {
            WeekStart::Monday => date.weekday().number_days_from_monday(),
            WeekStart::Sunday => date.weekday().number_days_from_sunday(),
        };
        date.saturating_sub(Duration::days(i64::from(days_in)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsOptions {
    pub week_start: WeekStart,
    pub weeks_back: u32,
    pub lookback_days: u32,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            week_start: WeekStart::default(),
            weeks_back: DEFAULT_WEEKS_BACK,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    pub week_label: String,
    #[serde(with = "time::serde::timestamp")]
    pub start: OffsetDateTime,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub weeks: Vec<WeekBucket>,
    pub longest_streak: u32,
    pub current_streak: u32,
    pub pending_notes: usize,
}

/// Midnight, in `instant`'s offset, of the first day of its week.
pub fn start_of_week(instant: OffsetDateTime, week_start: WeekStart) -> OffsetDateTime {
    week_start
        .week_of(instant.date())
        .midnight()
        .assume_offset(instant.offset())
}

/// Oldest week first. Notes are bucketed in `now`'s offset.
pub fn weekly_counts(
    notes: &[Note],
    now: OffsetDateTime,
    weeks_back: u32,
    week_start: WeekStart,
) -> Vec<WeekBucket> {
    let current = start_of_week(now, week_start);
    (0..weeks_back)
        .rev()
        .map(|weeks_ago| {
            let start = current.saturating_sub(Duration::weeks(i64::from(weeks_ago)));
            let end = start.saturating_add(Duration::weeks(1));
            let count = notes
                .iter()
                .filter(|note| start <= note.timestamp && note.timestamp < end)
                .count();
            WeekBucket {
                week_label: start.date().to_string(),
                start,
                count,
            }
        })
        .collect()
}

/// Longest run of consecutive note-containing weeks inside the lookback
/// window, wherever it sits. A quiet current week does not shorten it.
pub fn longest_streak(
    notes: &[Note],
    now: OffsetDateTime,
    lookback_days: u32,
    week_start: WeekStart,
) -> u32 {
    let note_weeks = note_weeks(notes, now, week_start);
    let horizon = now.saturating_sub(Duration::days(i64::from(lookback_days)));
    let mut cursor = now;
    let mut current = 0u32;
    let mut longest = 0u32;
    while cursor >= horizon {
        if note_weeks.contains(&week_start.week_of(cursor.date())) {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
        match cursor.checked_sub(Duration::weeks(1)) {
            Some(previous) => cursor = previous,
            None => break,
        }
    }
    longest
}

pub fn current_streak(notes: &[Note], now: OffsetDateTime, week_start: WeekStart) -> u32 {
    let note_weeks = note_weeks(notes, now, week_start);
    let mut week = week_start.week_of(now.date());
    let mut streak = 0u32;
    while note_weeks.contains(&week) {
        streak += 1;
        match week.checked_sub(Duration::weeks(1)) {
            Some(previous) => week = previous,
            None => break,
        }
    }
    streak
}

pub fn summarize(
    notes: &[Note],
    now: OffsetDateTime,
    options: &AnalyticsOptions,
) -> WeeklySummary {
    let summary = WeeklySummary {
        weeks: weekly_counts(notes, now, options.weeks_back, options.week_start),
        longest_streak: longest_streak(notes, now, options.lookback_days, options.week_start),
        current_streak: current_streak(notes, now, options.week_start),
        pending_notes: notes.iter().filter(|note| note.is_pending()).count(),
    };
    tracing::debug!(
        notes = notes.len(),
        weeks = summary.weeks.len(),
        longest_streak = summary.longest_streak,
        current_streak = summary.current_streak,
        "computed weekly summary"
    );
    summary
}

fn note_weeks(notes: &[Note], now: OffsetDateTime, week_start: WeekStart) -> HashSet<Date> {
    let offset = now.offset();
    notes
        .iter()
        .map(|note| week_start.week_of(note.timestamp.to_offset(offset).date()))
        .collect()
}
