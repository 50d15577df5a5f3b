use std::collections::BTreeMap;

use crate::entry::JournalEntry;
use crate::mood::Mood;

/// Number of entries per mood. Moods never used are absent.
pub fn mood_counts(entries: &[JournalEntry]) -> BTreeMap<Mood, usize> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        *counts.entry(entry.mood).or_insert(0) += 1;
    }
    counts
}
