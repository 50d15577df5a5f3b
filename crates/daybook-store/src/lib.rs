//! Document store boundary and the typed accessors built on it.
//!
//! A [`DocumentStore`] knows four operations over user-scoped collections:
//! append, full fetch ordered newest first, partial field update and delete.
//! [`EntryRepository`] and [`TodoRepository`] translate between those
//! documents and the journal's domain records.

pub mod document;
pub mod entries;
pub mod firestore;
pub mod local;
pub mod todos;

use std::cmp::Ordering;

use anyhow::Result;
use async_trait::async_trait;
use daybook_core::JournalError;

pub use document::{CollectionPath, Document, FieldValue, Fields};
pub use entries::EntryRepository;
pub use firestore::FirestoreStore;
pub use local::{LocalDocumentStore, atomic_write, ensure_private_dir, with_file_lock};
pub use todos::TodoRepository;

/// Persistence for per-user document collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Append a document; the store assigns and returns its id.
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String>;

    /// Every document, ordered by the timestamp field `order_field`
    /// descending. Documents without the field are included and come last.
    async fn list_newest_first(
        &self,
        collection: &CollectionPath,
        order_field: &str,
    ) -> Result<Vec<Document>>;

    /// Overwrite the given fields and leave the rest untouched.
    ///
    /// Fails with `JournalError::NotFound` when the document is missing.
    async fn update(&self, collection: &CollectionPath, id: &str, fields: Fields) -> Result<()>;

    /// Remove a document. Removing a missing id is not an error.
    async fn delete(&self, collection: &CollectionPath, id: &str) -> Result<()>;
}

/// Newest first by `order_field`; documents without it go last, ties by id.
pub(crate) fn sort_newest_first(documents: &mut [Document], order_field: &str) {
    documents.sort_by(|a, b| {
        let a_at = a.timestamp(order_field).ok().flatten();
        let b_at = b.timestamp(order_field).ok().flatten();
        match (a_at, b_at) {
            (Some(a_at), Some(b_at)) => b_at.cmp(&a_at).then_with(|| b.id.cmp(&a.id)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => b.id.cmp(&a.id),
        }
    });
}

/// Report a store-level missing document as the record kind the caller asked for.
pub(crate) fn name_missing(error: anyhow::Error, kind: &'static str) -> anyhow::Error {
    match error.downcast::<JournalError>() {
        Ok(JournalError::NotFound { id, .. }) => JournalError::NotFound { kind, id }.into(),
        Ok(other) => other.into(),
        Err(error) => error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn doc(id: &str, day: Option<u32>) -> Document {
        let mut fields = Fields::new();
        if let Some(day) = day {
            fields.insert(
                "createdAt".into(),
                FieldValue::TimestampValue(Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap()),
            );
        }
        Document {
            id: id.into(),
            fields,
        }
    }

    #[test]
    fn test_sort_newest_first_missing_field_last() {
        let mut docs = vec![doc("a", Some(1)), doc("b", None), doc("c", Some(3))];
        sort_newest_first(&mut docs, "createdAt");
        let ids: Vec<&str> = docs.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "b"]);
    }

    #[test]
    fn test_sort_newest_first_ties_by_id() {
        let mut docs = vec![doc("a", Some(2)), doc("b", Some(2))];
        sort_newest_first(&mut docs, "createdAt");
        assert_eq!(docs[0].id, "b");
    }

    #[test]
    fn test_name_missing_rewrites_kind_only() {
        let err: anyhow::Error = JournalError::NotFound {
            kind: "document",
            id: "x1".into(),
        }
        .into();
        let renamed = name_missing(err, "todo");
        assert_eq!(
            renamed.downcast_ref::<JournalError>(),
            Some(&JournalError::NotFound {
                kind: "todo",
                id: "x1".into()
            })
        );

        let other = name_missing(anyhow::anyhow!("network down"), "todo");
        assert_eq!(other.to_string(), "network down");
    }
}
