//! Per-day mood aggregation for the calendar view.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::entry::JournalEntry;
use crate::error::JournalError;
use crate::mood::Mood;

/// Display state of one calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkedDate {
    /// Mood of the latest entry written that day.
    pub mood: Option<Mood>,
    /// At least one entry exists on this date.
    pub marked: bool,
    pub selected: bool,
}

impl MarkedDate {
    pub fn glyph(&self) -> Option<&'static str> {
        self.mood.as_ref().map(Mood::emoji)
    }
}

/// Parse a `YYYY-MM-DD` date key.
pub fn parse_date_key(raw: &str) -> Result<NaiveDate, JournalError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| JournalError::InvalidDate(raw.to_string()))
}

pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn mood_by_date(entries: &[JournalEntry]) -> BTreeMap<NaiveDate, Mood> {
    mood_by_date_in(entries, &Local)
}

/// Group entries by calendar date in `tz`; the latest `created_at` wins.
///
/// Input order does not matter. When two entries share the exact same
/// instant the first one seen is kept.
pub fn mood_by_date_in<Tz: TimeZone>(
    entries: &[JournalEntry],
    tz: &Tz,
) -> BTreeMap<NaiveDate, Mood> {
    let mut latest: BTreeMap<NaiveDate, (DateTime<Utc>, Mood)> = BTreeMap::new();
    for entry in entries {
        let date = entry.local_date(tz);
        let is_newer = latest
            .get(&date)
            .is_none_or(|(seen_at, _)| entry.created_at > *seen_at);
        if is_newer {
            latest.insert(date, (entry.created_at, entry.mood));
        }
    }
    latest
        .into_iter()
        .map(|(date, (_, mood))| (date, mood))
        .collect()
}

pub fn marked_dates(
    entries: &[JournalEntry],
    selected: Option<NaiveDate>,
) -> BTreeMap<NaiveDate, MarkedDate> {
    marked_dates_in(entries, selected, &Local)
}

/// Calendar markers: every date with entries carries its mood, and the
/// selected date is flagged whether or not anything was written on it.
pub fn marked_dates_in<Tz: TimeZone>(
    entries: &[JournalEntry],
    selected: Option<NaiveDate>,
    tz: &Tz,
) -> BTreeMap<NaiveDate, MarkedDate> {
    let mut marked: BTreeMap<NaiveDate, MarkedDate> = mood_by_date_in(entries, tz)
        .into_iter()
        .map(|(date, mood)| {
            (
                date,
                MarkedDate {
                    mood: Some(mood),
                    marked: true,
                    selected: selected == Some(date),
                },
            )
        })
        .collect();

    if let Some(date) = selected {
        marked.entry(date).or_insert(MarkedDate {
            mood: None,
            marked: false,
            selected: true,
        });
    }
    marked
}

/// Emoji shown in the calendar cell for `date`, if anything was written.
pub fn mood_glyph_for<Tz: TimeZone>(
    entries: &[JournalEntry],
    date: NaiveDate,
    tz: &Tz,
) -> Option<&'static str> {
    mood_by_date_in(entries, tz).get(&date).map(Mood::emoji)
}
