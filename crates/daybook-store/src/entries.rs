//! Journal entries as documents under `users/{uid}/entries`.
//!
//! Fields: `text` (string), `mood` (string), `createdAt` (timestamp).

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use daybook_core::{EntryDraft, EntryId, JournalEntry, Mood, UserId};
use tracing::{debug, warn};

use crate::DocumentStore;
use crate::document::{CollectionPath, Document, ENTRIES_COLLECTION, FieldValue, Fields};

const TEXT: &str = "text";
const MOOD: &str = "mood";
const CREATED_AT: &str = "createdAt";

#[derive(Clone)]
pub struct EntryRepository {
    store: Arc<dyn DocumentStore>,
    collection: CollectionPath,
}

impl EntryRepository {
    pub fn for_user(store: Arc<dyn DocumentStore>, user: &UserId) -> Self {
        Self {
            store,
            collection: CollectionPath::for_user(user, ENTRIES_COLLECTION),
        }
    }

    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    /// Append a new entry stamped with the current time.
    pub async fn create(&self, draft: &EntryDraft) -> Result<EntryId> {
        self.create_at(draft, Utc::now()).await
    }

    pub async fn create_at(&self, draft: &EntryDraft, created_at: DateTime<Utc>) -> Result<EntryId> {
        let mut fields = content_fields(draft);
        fields.insert(CREATED_AT.into(), FieldValue::TimestampValue(created_at));
        let id = self
            .store
            .add(&self.collection, fields)
            .await
            .context("Failed to save entry")?;
        debug!(%id, mood = %draft.mood(), "created entry");
        Ok(EntryId::new(id))
    }

    /// All entries, newest first.
    ///
    /// Documents that cannot be decoded are skipped with a warning. A missing
    /// `createdAt` is read as the current time.
    pub async fn fetch_all(&self) -> Result<Vec<JournalEntry>> {
        let documents = self
            .store
            .list_newest_first(&self.collection, CREATED_AT)
            .await
            .context("Failed to load entries")?;
        let now = Utc::now();
        let mut entries: Vec<JournalEntry> = documents
            .iter()
            .filter_map(|doc| match decode_entry(doc, now) {
                Ok(entry) => Some(entry),
                Err(error) => {
                    warn!(id = %doc.id, error = %format!("{error:#}"), "skipping unreadable entry");
                    None
                }
            })
            .collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(entries)
    }

    /// Replace text and mood; `createdAt` is left as it was.
    pub async fn update(&self, id: &EntryId, draft: &EntryDraft) -> Result<()> {
        self.store
            .update(&self.collection, id.as_str(), content_fields(draft))
            .await
            .map_err(|error| crate::name_missing(error, "entry"))?;
        debug!(%id, "updated entry");
        Ok(())
    }

    pub async fn delete(&self, id: &EntryId) -> Result<()> {
        self.store
            .delete(&self.collection, id.as_str())
            .await
            .with_context(|| format!("Failed to delete entry {id}"))?;
        debug!(%id, "deleted entry");
        Ok(())
    }
}

fn content_fields(draft: &EntryDraft) -> Fields {
    let mut fields = Fields::new();
    fields.insert(TEXT.into(), FieldValue::string(draft.text()));
    fields.insert(MOOD.into(), FieldValue::string(draft.mood().as_str()));
    fields
}

fn decode_entry(doc: &Document, now: DateTime<Utc>) -> Result<JournalEntry> {
    let text = doc.string(TEXT)?.to_string();
    let mood: Mood = doc.string(MOOD)?.parse()?;
    let created_at = doc.timestamp(CREATED_AT)?.unwrap_or(now);
    Ok(JournalEntry {
        id: EntryId::new(doc.id.clone()),
        text,
        mood,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LocalDocumentStore;
    use chrono::TimeZone;
    use daybook_core::JournalError;
    use tempfile::TempDir;
    use tempfile::tempdir;

    fn repo() -> (TempDir, EntryRepository) {
        let dir = tempdir().unwrap();
        let store = Arc::new(LocalDocumentStore::new(dir.path().to_path_buf()));
        let user = UserId::new("u1").unwrap();
        (dir, EntryRepository::for_user(store, &user))
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_and_fetch_newest_first() {
        let (_dir, repo) = repo();
        let draft = EntryDraft::new("first", Mood::Calm).unwrap();
        let older = repo.create_at(&draft, at(1, 8)).await.unwrap();
        let draft = EntryDraft::new("second", Mood::Sad).unwrap();
        let newer = repo.create_at(&draft, at(2, 8)).await.unwrap();

        let entries = repo.fetch_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, newer);
        assert_eq!(entries[0].text, "second");
        assert_eq!(entries[0].mood, Mood::Sad);
        assert_eq!(entries[0].created_at, at(2, 8));
        assert_eq!(entries[1].id, older);
    }

    #[tokio::test]
    async fn test_update_keeps_created_at() {
        let (_dir, repo) = repo();
        let id = repo
            .create_at(&EntryDraft::new("draft", Mood::Happy).unwrap(), at(5, 9))
            .await
            .unwrap();

        repo.update(&id, &EntryDraft::new("final", Mood::Grateful).unwrap())
            .await
            .unwrap();

        let entries = repo.fetch_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "final");
        assert_eq!(entries[0].mood, Mood::Grateful);
        assert_eq!(entries[0].created_at, at(5, 9));
    }

    #[tokio::test]
    async fn test_update_missing_entry_is_not_found() {
        let (_dir, repo) = repo();
        let err = repo
            .update(
                &EntryId::new("gone"),
                &EntryDraft::new("x", Mood::Happy).unwrap(),
            )
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<JournalError>(),
            Some(&JournalError::NotFound {
                kind: "entry",
                id: "gone".into()
            })
        );
    }

    #[tokio::test]
    async fn test_delete_removes_entry() {
        let (_dir, repo) = repo();
        let id = repo
            .create(&EntryDraft::new("bye", Mood::Tired).unwrap())
            .await
            .unwrap();
        repo.delete(&id).await.unwrap();
        assert!(repo.fetch_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_and_undated_documents() {
        let (_dir, repo) = repo();
        repo.create_at(&EntryDraft::new("dated", Mood::Calm).unwrap(), at(1, 8))
            .await
            .unwrap();

        let mut bad_mood = Fields::new();
        bad_mood.insert(TEXT.into(), FieldValue::string("odd"));
        bad_mood.insert(MOOD.into(), FieldValue::string("ecstatic"));
        bad_mood.insert(CREATED_AT.into(), FieldValue::TimestampValue(at(2, 8)));
        repo.store.add(&repo.collection, bad_mood).await.unwrap();

        let mut undated = Fields::new();
        undated.insert(TEXT.into(), FieldValue::string("no date"));
        undated.insert(MOOD.into(), FieldValue::string("happy"));
        repo.store.add(&repo.collection, undated).await.unwrap();

        let entries = repo.fetch_all().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "no date");
        assert!(entries[0].created_at > at(1, 8));
        assert_eq!(entries[1].text, "dated");
    }
}
