use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::JournalError;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(String);

impl TodoId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

/// Validated text for a new todo. Surrounding whitespace is dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoDraft {
    text: String,
}

impl TodoDraft {
    pub fn new(text: &str) -> Result<Self, JournalError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(JournalError::EmptyTodo);
        }
        Ok(Self {
            text: text.to_string(),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Which half of the list is on screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoView {
    #[default]
    Active,
    Completed,
}

impl TodoView {
    pub fn from_show_completed(show_completed: bool) -> Self {
        if show_completed {
            Self::Completed
        } else {
            Self::Active
        }
    }

    pub fn includes(&self, item: &TodoItem) -> bool {
        match self {
            Self::Active => !item.completed,
            Self::Completed => item.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TodoCounts {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
}

pub fn filter_todos(items: &[TodoItem], view: TodoView) -> Vec<&TodoItem> {
    items.iter().filter(|item| view.includes(item)).collect()
}

pub fn count_todos(items: &[TodoItem]) -> TodoCounts {
    let completed = items.iter().filter(|item| item.completed).count();
    TodoCounts {
        total: items.len(),
        active: items.len() - completed,
        completed,
    }
}
