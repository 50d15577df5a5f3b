//! Consecutive-day writing streak.

use chrono::{Local, TimeZone};

use crate::entry::JournalEntry;

/// Streak for entries sorted newest first, measured in the local timezone.
pub fn compute_streak(entries: &[JournalEntry]) -> u32 {
    compute_streak_in(entries, &Local)
}

/// Count consecutive calendar days ending at the most recent entry.
///
/// `entries` must already be sorted by `created_at` descending. Days are
/// compared as calendar dates in `tz`, so a DST shift cannot turn a one-day
/// gap into zero or two. The walk stops at the first pair whose gap is not
/// exactly one day; two entries on the same day stop it too.
pub fn compute_streak_in<Tz: TimeZone>(entries: &[JournalEntry], tz: &Tz) -> u32 {
    if entries.is_empty() {
        return 0;
    }

    let mut streak = 1;
    for pair in entries.windows(2) {
        let newer = pair[0].local_date(tz);
        let older = pair[1].local_date(tz);
        if (newer - older).num_days() == 1 {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}
