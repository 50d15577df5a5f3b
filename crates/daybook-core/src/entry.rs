use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::JournalError;
use crate::mood::Mood;

/// Stable identifier issued by the identity boundary.
///
/// Used as a path segment by every store backend, so separators and
/// traversal components are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    pub fn new(raw: impl Into<String>) -> Result<Self, JournalError> {
        let raw = raw.into();
        if raw.trim().is_empty()
            || raw.contains('/')
            || raw.contains('\\')
            || raw.contains("..")
        {
            return Err(JournalError::InvalidUserId(raw));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = JournalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Store-assigned entry identifier. Opaque to the journal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntryId,
    pub text: String,
    pub mood: Mood,
    pub created_at: DateTime<Utc>,
}

impl JournalEntry {
    /// Calendar day of creation in `tz`; time of day is discarded.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.created_at.with_timezone(tz).date_naive()
    }
}

/// Validated content for creating or editing an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    text: String,
    mood: Mood,
}

impl EntryDraft {
    /// Rejects text that is empty after trimming. The text is kept as typed.
    pub fn new(text: impl Into<String>, mood: Mood) -> Result<Self, JournalError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(JournalError::EmptyEntry);
        }
        Ok(Self { text, mood })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mood(&self) -> Mood {
        self.mood
    }
}

/// Resolve a unique id prefix against a set of ids.
///
/// An exact match always wins, even if it is also a prefix of another id.
pub fn resolve_prefix<'a, I>(kind: &'static str, prefix: &str, ids: I) -> Result<&'a str, JournalError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut found: Option<&'a str> = None;
    let mut ambiguous = false;
    for id in ids {
        if id == prefix {
            return Ok(id);
        }
        if !prefix.is_empty() && id.starts_with(prefix) {
            if found.is_some() {
                ambiguous = true;
            } else {
                found = Some(id);
            }
        }
    }
    if ambiguous {
        return Err(JournalError::AmbiguousId {
            kind,
            id: prefix.to_string(),
        });
    }
    found.ok_or_else(|| JournalError::NotFound {
        kind,
        id: prefix.to_string(),
    })
}
