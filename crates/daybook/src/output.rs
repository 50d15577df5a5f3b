use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use daybook_core::JournalEntry;
use daybook_core::display::relative_date_label;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// First line of `s`, cut to `max_len` characters with an ellipsis.
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    let line = s.trim().lines().next().unwrap_or_default();
    let more_lines = s.trim().lines().nth(1).is_some();
    if line.chars().count() <= max_len && !more_lines {
        return line.to_string();
    }
    let kept: String = line.chars().take(max_len.saturating_sub(3)).collect();
    format!("{kept}...")
}

pub(crate) fn date_label(at: DateTime<Utc>) -> String {
    relative_date_label(at, Utc::now(), &Local)
}

pub(crate) fn print_entry_table(entries: &[&JournalEntry]) {
    println!("{:<26}  {:<12}  {:<12}  TEXT", "ID", "DATE", "MOOD");
    for entry in entries {
        println!(
            "{:<26}  {:<12}  {} {:<9}  {}",
            entry.id,
            date_label(entry.created_at),
            entry.mood.emoji(),
            entry.mood.label(),
            truncate(&entry.text, 50),
        );
    }
}
