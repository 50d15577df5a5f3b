use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};

/// Short label for when an entry was written, relative to `now`.
///
/// `Today`, `Yesterday`, `Mar 3` within the current year, `Mar 3, 2023`
/// otherwise. Calendar days are taken in `tz`.
pub fn relative_date_label<Tz: TimeZone>(at: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> String {
    let date = at.with_timezone(tz).date_naive();
    let today = now.with_timezone(tz).date_naive();

    if date == today {
        return "Today".to_string();
    }
    if date == today - Duration::days(1) {
        return "Yesterday".to_string();
    }
    if date.year() == today.year() {
        date.format("%b %-d").to_string()
    } else {
        date.format("%b %-d, %Y").to_string()
    }
}
