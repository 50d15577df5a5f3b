use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate};
use daybook_core::{EntryFilter, JournalError, MarkedDate, date_key, parse_date_key};
use serde_json::json;

use crate::cli::OutputFormat;
use crate::context::AppContext;
use crate::output::{print_entry_table, print_json};

const CELL_WIDTH: usize = 6;

pub(crate) async fn handle_calendar(
    ctx: &AppContext,
    month: Option<String>,
    select: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let today = Local::now().date_naive();
    let selected = select.as_deref().map(parse_date_key).transpose()?;
    let first = match month.as_deref() {
        Some(raw) => parse_month(raw)?,
        None => first_of_month(selected.unwrap_or(today)),
    };

    let book = ctx.journal().await?;
    let marks: BTreeMap<NaiveDate, MarkedDate> = book
        .marked_dates(selected)
        .into_iter()
        .filter(|(date, _)| same_month(*date, first))
        .collect();
    let selected_entries = match selected {
        Some(date) => book.filtered(&EntryFilter::new(None, Some(date))),
        None => Vec::new(),
    };

    if format == OutputFormat::Json {
        let dates: BTreeMap<String, &MarkedDate> =
            marks.iter().map(|(date, mark)| (date_key(*date), mark)).collect();
        return print_json(&json!({
            "month": first.format("%Y-%m").to_string(),
            "selected": selected.map(date_key),
            "dates": dates,
            "entries": selected_entries,
        }));
    }

    print!("{}", render_month(first, &marks, today));
    if let Some(date) = selected {
        println!();
        if selected_entries.is_empty() {
            println!("No entries on {}.", date_key(date));
        } else {
            print_entry_table(&selected_entries);
        }
    }
    Ok(())
}

/// `YYYY-MM` to the first day of that month.
pub(crate) fn parse_month(raw: &str) -> Result<NaiveDate, JournalError> {
    NaiveDate::parse_from_str(&format!("{}-01", raw.trim()), "%Y-%m-%d")
        .map_err(|_| JournalError::InvalidMonth(raw.to_string()))
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn same_month(date: NaiveDate, first: NaiveDate) -> bool {
    date.year() == first.year() && date.month() == first.month()
}

/// Sunday-first month grid. `(d)` marks today, `[d]` the selection, and a
/// day with entries carries the mood of its latest one.
pub(crate) fn render_month(
    first: NaiveDate,
    marks: &BTreeMap<NaiveDate, MarkedDate>,
    today: NaiveDate,
) -> String {
    let mut out = format!("{}\n", first.format("%B %Y"));
    for name in ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"] {
        out.push_str(&format!(" {name:<width$}", width = CELL_WIDTH - 1));
    }
    out.push('\n');

    let lead = first.weekday().num_days_from_sunday() as usize;
    let mut row: Vec<String> = vec![" ".repeat(CELL_WIDTH); lead];
    let mut day = first;
    while same_month(day, first) {
        let mark = marks.get(&day);
        row.push(render_cell(day, mark, day == today));
        if row.len() == 7 {
            out.push_str(row.concat().trim_end());
            out.push('\n');
            row.clear();
        }
        match day.succ_opt() {
            Some(next) => day = next,
            None => break,
        }
    }
    if !row.is_empty() {
        out.push_str(row.concat().trim_end());
        out.push('\n');
    }
    out
}

fn render_cell(day: NaiveDate, mark: Option<&MarkedDate>, is_today: bool) -> String {
    let (open, close) = match (mark.is_some_and(|m| m.selected), is_today) {
        (true, _) => ('[', ']'),
        (false, true) => ('(', ')'),
        (false, false) => (' ', ' '),
    };
    let glyph = mark.and_then(MarkedDate::glyph).unwrap_or("  ");
    format!("{open}{:>2}{close}{glyph}", day.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybook_core::Mood;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-02").unwrap(), date(2024, 2, 1));
        assert_eq!(
            parse_month("2024-13").unwrap_err(),
            JournalError::InvalidMonth("2024-13".into())
        );
        assert!(parse_month("March").is_err());
    }

    #[test]
    fn test_render_month_layout() {
        // March 2024 starts on a Friday.
        let grid = render_month(date(2024, 3, 1), &BTreeMap::new(), date(2000, 1, 1));
        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines[0], "March 2024");
        assert!(lines[1].starts_with(" Su"));
        assert_eq!(lines[2].trim(), "1     2");
        assert!(lines.last().unwrap().contains("31"));
        assert_eq!(lines.len(), 2 + 6);
    }

    #[test]
    fn test_render_marks_mood_today_and_selection() {
        let mut marks = BTreeMap::new();
        marks.insert(
            date(2024, 3, 3),
            MarkedDate {
                mood: Some(Mood::Calm),
                marked: true,
                selected: false,
            },
        );
        marks.insert(
            date(2024, 3, 9),
            MarkedDate {
                mood: None,
                marked: false,
                selected: true,
            },
        );
        let grid = render_month(date(2024, 3, 1), &marks, date(2024, 3, 5));
        assert!(grid.contains(&format!(" 3 {}", Mood::Calm.emoji())));
        assert!(grid.contains("( 5)"));
        assert!(grid.contains("[ 9]"));
    }
}
