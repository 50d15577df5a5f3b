//! The signed-in user's todo list.

use anyhow::Result;
use daybook_core::{
    JournalError, TodoCounts, TodoDraft, TodoId, TodoItem, TodoView, count_todos, filter_todos,
    resolve_prefix,
};
use daybook_store::TodoRepository;
use tracing::{debug, warn};

pub struct TodoBoard {
    repo: TodoRepository,
    items: Vec<TodoItem>,
}

impl TodoBoard {
    pub fn new(repo: TodoRepository) -> Self {
        Self {
            repo,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// On failure the previous list is kept.
    pub async fn load(&mut self) -> Result<()> {
        match self.repo.fetch_all().await {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(err) => {
                debug!(error = %format!("{err:#}"), "failed to load todos");
                Err(err)
            }
        }
    }

    pub async fn add(&mut self, text: &str) -> Result<TodoId> {
        let draft = TodoDraft::new(text)?;
        let id = self.repo.create(&draft).await.inspect_err(|err| {
            debug!(error = %format!("{err:#}"), "failed to add todo");
        })?;
        self.reload_after_write().await;
        Ok(id)
    }

    /// Flip the completed flag as currently loaded. Returns the new value.
    pub async fn toggle(&mut self, id: &TodoId) -> Result<bool> {
        let current = self
            .items
            .iter()
            .find(|item| &item.id == id)
            .map(|item| item.completed)
            .ok_or_else(|| JournalError::NotFound {
                kind: "todo",
                id: id.to_string(),
            })?;
        let completed = !current;
        self.repo
            .set_completed(id, completed)
            .await
            .inspect_err(|err| {
                debug!(%id, error = %format!("{err:#}"), "failed to update todo");
            })?;
        self.reload_after_write().await;
        Ok(completed)
    }

    pub async fn delete(&mut self, id: &TodoId) -> Result<()> {
        self.repo.delete(id).await.inspect_err(|err| {
            debug!(%id, error = %format!("{err:#}"), "failed to delete todo");
        })?;
        self.reload_after_write().await;
        Ok(())
    }

    async fn reload_after_write(&mut self) {
        if let Err(err) = self.load().await {
            warn!(error = %format!("{err:#}"), "todo list may be stale until the next load");
        }
    }

    pub fn visible(&self, view: TodoView) -> Vec<&TodoItem> {
        filter_todos(&self.items, view)
    }

    pub fn counts(&self) -> TodoCounts {
        count_todos(&self.items)
    }

    pub fn resolve(&self, prefix: &str) -> Result<&TodoItem> {
        let id = resolve_prefix("todo", prefix, self.items.iter().map(|t| t.id.as_str()))?;
        self.items
            .iter()
            .find(|t| t.id.as_str() == id)
            .ok_or_else(|| anyhow::anyhow!("todo {id} vanished during lookup"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FlakyStore, test_user};
    use std::sync::Arc;
    use tempfile::tempdir;

    fn board(store: &Arc<FlakyStore>) -> TodoBoard {
        let store: Arc<dyn daybook_store::DocumentStore> = store.clone();
        TodoBoard::new(TodoRepository::for_user(store, &test_user()))
    }

    #[tokio::test]
    async fn test_add_toggle_and_views() {
        let dir = tempdir().unwrap();
        let store = FlakyStore::new(&dir);
        let mut board = board(&store);

        let id = board.add(" call mom ").await.unwrap();
        board.add("read a chapter").await.unwrap();
        assert_eq!(board.visible(TodoView::Active).len(), 2);
        assert!(board.visible(TodoView::Completed).is_empty());

        assert!(board.toggle(&id).await.unwrap());
        let done = board.visible(TodoView::Completed);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].text, "call mom");
        assert_eq!(
            board.counts(),
            TodoCounts {
                total: 2,
                active: 1,
                completed: 1
            }
        );

        assert!(!board.toggle(&id).await.unwrap());
        assert_eq!(board.visible(TodoView::Active).len(), 2);
    }

    #[tokio::test]
    async fn test_blank_add_makes_no_store_call() {
        let dir = tempdir().unwrap();
        let store = FlakyStore::new(&dir);
        let mut board = board(&store);

        let err = board.add("  ").await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<JournalError>(),
            Some(&JournalError::EmptyTodo)
        );
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_toggle_unloaded_id_is_not_found() {
        let dir = tempdir().unwrap();
        let store = FlakyStore::new(&dir);
        let mut board = board(&store);

        let err = board.toggle(&TodoId::new("ghost")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<JournalError>(),
            Some(JournalError::NotFound { kind: "todo", .. })
        ));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_delete_and_resolve() {
        let dir = tempdir().unwrap();
        let store = FlakyStore::new(&dir);
        let mut board = board(&store);
        let id = board.add("temporary").await.unwrap();

        let found = board.resolve(id.as_str()).unwrap().id.clone();
        board.delete(&found).await.unwrap();
        assert!(board.items().is_empty());
        assert!(board.resolve(id.as_str()).is_err());
    }

    #[tokio::test]
    async fn test_failed_load_keeps_items() {
        let dir = tempdir().unwrap();
        let store = FlakyStore::new(&dir);
        let mut board = board(&store);
        board.add("stay").await.unwrap();

        store.set_fail_reads(true);
        assert!(board.load().await.is_err());
        assert_eq!(board.items().len(), 1);
    }
}
