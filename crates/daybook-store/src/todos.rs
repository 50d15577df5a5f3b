//! Todo items as documents under `users/{uid}/todos`.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use daybook_core::{TodoDraft, TodoId, TodoItem, UserId};
use tracing::{debug, warn};

use crate::DocumentStore;
use crate::document::{CollectionPath, Document, FieldValue, Fields, TODOS_COLLECTION};

const TEXT: &str = "text";
const COMPLETED: &str = "completed";
const CREATED_AT: &str = "createdAt";

#[derive(Clone)]
pub struct TodoRepository {
    store: Arc<dyn DocumentStore>,
    collection: CollectionPath,
}

impl TodoRepository {
    pub fn for_user(store: Arc<dyn DocumentStore>, user: &UserId) -> Self {
        Self {
            store,
            collection: CollectionPath::for_user(user, TODOS_COLLECTION),
        }
    }

    /// New items always start incomplete.
    pub async fn create(&self, draft: &TodoDraft) -> Result<TodoId> {
        let mut fields = Fields::new();
        fields.insert(TEXT.into(), FieldValue::string(draft.text()));
        fields.insert(COMPLETED.into(), FieldValue::BooleanValue(false));
        fields.insert(CREATED_AT.into(), FieldValue::TimestampValue(Utc::now()));
        let id = self
            .store
            .add(&self.collection, fields)
            .await
            .context("Failed to add task")?;
        debug!(%id, "created todo");
        Ok(TodoId::new(id))
    }

    /// All items, newest first, completed or not.
    pub async fn fetch_all(&self) -> Result<Vec<TodoItem>> {
        let documents = self
            .store
            .list_newest_first(&self.collection, CREATED_AT)
            .await
            .context("Failed to load tasks")?;
        let now = Utc::now();
        let mut items: Vec<TodoItem> = documents
            .iter()
            .filter_map(|doc| match decode_todo(doc, now) {
                Ok(item) => Some(item),
                Err(error) => {
                    warn!(id = %doc.id, error = %format!("{error:#}"), "skipping unreadable todo");
                    None
                }
            })
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    /// Write only `completed`; text and creation time stay as stored.
    pub async fn set_completed(&self, id: &TodoId, completed: bool) -> Result<()> {
        let mut fields = Fields::new();
        fields.insert(COMPLETED.into(), FieldValue::BooleanValue(completed));
        self.store
            .update(&self.collection, id.as_str(), fields)
            .await
            .map_err(|error| crate::name_missing(error, "todo"))?;
        debug!(%id, completed, "updated todo");
        Ok(())
    }

    pub async fn delete(&self, id: &TodoId) -> Result<()> {
        self.store
            .delete(&self.collection, id.as_str())
            .await
            .with_context(|| format!("Failed to delete task {id}"))?;
        debug!(%id, "deleted todo");
        Ok(())
    }
}

fn decode_todo(doc: &Document, now: DateTime<Utc>) -> Result<TodoItem> {
    // Older documents may predate the completed flag.
    let completed = match doc.fields.get(COMPLETED) {
        None => false,
        Some(_) => doc.boolean(COMPLETED)?,
    };
    Ok(TodoItem {
        id: TodoId::new(doc.id.clone()),
        text: doc.string(TEXT)?.to_string(),
        completed,
        created_at: doc.timestamp(CREATED_AT)?.unwrap_or(now),
    })
}
