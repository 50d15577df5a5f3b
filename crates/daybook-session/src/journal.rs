//! The signed-in user's journal: loaded entries plus their derived views.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::NaiveDate;
use daybook_core::{
    EntryDraft, EntryFilter, EntryId, JournalEntry, MarkedDate, Mood, compute_streak,
    filter_entries, marked_dates, mood_by_date, mood_counts, resolve_prefix,
};
use daybook_store::EntryRepository;
use tracing::{debug, warn};

pub struct JournalBook {
    repo: EntryRepository,
    entries: Vec<JournalEntry>,
    streak: u32,
}

impl JournalBook {
    pub fn new(repo: EntryRepository) -> Self {
        Self {
            repo,
            entries: Vec::new(),
            streak: 0,
        }
    }

    /// Entries as of the last successful load, newest first.
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    /// Replace the list with the store's contents and recompute the streak.
    ///
    /// On failure the previous list and streak are kept.
    pub async fn load(&mut self) -> Result<()> {
        match self.repo.fetch_all().await {
            Ok(entries) => {
                self.streak = compute_streak(&entries);
                self.entries = entries;
                Ok(())
            }
            Err(err) => {
                debug!(error = %format!("{err:#}"), "failed to load entries");
                Err(err)
            }
        }
    }

    pub async fn save(&mut self, text: &str, mood: Mood) -> Result<EntryId> {
        let draft = EntryDraft::new(text, mood)?;
        let id = self.repo.create(&draft).await.inspect_err(|err| {
            debug!(error = %format!("{err:#}"), "failed to save entry");
        })?;
        self.reload_after_write().await;
        Ok(id)
    }

    pub async fn update(&mut self, id: &EntryId, text: &str, mood: Mood) -> Result<()> {
        let draft = EntryDraft::new(text, mood)?;
        self.repo.update(id, &draft).await.inspect_err(|err| {
            debug!(%id, error = %format!("{err:#}"), "failed to update entry");
        })?;
        self.reload_after_write().await;
        Ok(())
    }

    pub async fn delete(&mut self, id: &EntryId) -> Result<()> {
        self.repo.delete(id).await.inspect_err(|err| {
            debug!(%id, error = %format!("{err:#}"), "failed to delete entry");
        })?;
        self.reload_after_write().await;
        Ok(())
    }

    /// The write already happened; a stale list is not a reason to report it failed.
    async fn reload_after_write(&mut self) {
        if let Err(err) = self.load().await {
            warn!(error = %format!("{err:#}"), "entry list may be stale until the next load");
        }
    }

    pub fn filtered(&self, filter: &EntryFilter) -> Vec<&JournalEntry> {
        filter_entries(&self.entries, filter)
    }

    pub fn mood_by_date(&self) -> BTreeMap<NaiveDate, Mood> {
        mood_by_date(&self.entries)
    }

    pub fn marked_dates(&self, selected: Option<NaiveDate>) -> BTreeMap<NaiveDate, MarkedDate> {
        marked_dates(&self.entries, selected)
    }

    pub fn mood_counts(&self) -> BTreeMap<Mood, usize> {
        mood_counts(&self.entries)
    }

    /// Find a loaded entry by id or unique id prefix.
    pub fn resolve(&self, prefix: &str) -> Result<&JournalEntry> {
        let id = resolve_prefix("entry", prefix, self.entries.iter().map(|e| e.id.as_str()))?;
        self.entries
            .iter()
            .find(|e| e.id.as_str() == id)
            .ok_or_else(|| anyhow::anyhow!("entry {id} vanished during lookup"))
    }
}

#[cfg(test)]
#[path = "journal_tests.rs"]
mod tests;
