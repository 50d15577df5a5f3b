use chrono::{Local, NaiveDate, TimeZone};

use crate::entry::JournalEntry;

/// Search text and date selection applied to the entry list.
///
/// Both parts are optional; when both are set an entry has to satisfy both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryFilter {
    pub query: Option<String>,
    pub date: Option<NaiveDate>,
}

impl EntryFilter {
    pub fn new(query: Option<String>, date: Option<NaiveDate>) -> Self {
        Self { query, date }
    }

    /// Search is active only for a query with visible characters.
    fn active_query(&self) -> Option<String> {
        self.query
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .map(str::to_lowercase)
    }

    pub fn is_active(&self) -> bool {
        self.active_query().is_some() || self.date.is_some()
    }

    pub fn matches_in<Tz: TimeZone>(&self, entry: &JournalEntry, tz: &Tz) -> bool {
        if let Some(query) = self.active_query() {
            let hit = entry.text.to_lowercase().contains(&query)
                || entry.mood.as_str().contains(&query);
            if !hit {
                return false;
            }
        }
        match self.date {
            Some(date) => entry.local_date(tz) == date,
            None => true,
        }
    }
}

pub fn filter_entries<'a>(entries: &'a [JournalEntry], filter: &EntryFilter) -> Vec<&'a JournalEntry> {
    filter_entries_in(entries, filter, &Local)
}

pub fn filter_entries_in<'a, Tz: TimeZone>(
    entries: &'a [JournalEntry],
    filter: &EntryFilter,
    tz: &Tz,
) -> Vec<&'a JournalEntry> {
    entries
        .iter()
        .filter(|entry| filter.matches_in(entry, tz))
        .collect()
}
