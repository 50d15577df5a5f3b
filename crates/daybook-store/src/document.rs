//! Backend-neutral document model.
//!
//! Field values use Firestore's typed-value JSON shape
//! (`{"stringValue": "..."}`), so the Firestore backend sends them as-is and
//! the local backend stores the same form on disk.

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use daybook_core::UserId;
use serde::{Deserialize, Serialize};

pub const ENTRIES_COLLECTION: &str = "entries";
pub const TODOS_COLLECTION: &str = "todos";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldValue {
    StringValue(String),
    BooleanValue(bool),
    TimestampValue(DateTime<Utc>),
}

impl FieldValue {
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringValue(value.into())
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::TimestampValue(at) => Some(*at),
            _ => None,
        }
    }
}

pub type Fields = BTreeMap<String, FieldValue>;

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn string(&self, name: &str) -> Result<&str> {
        match self.fields.get(name) {
            Some(FieldValue::StringValue(value)) => Ok(value),
            Some(other) => bail!("field '{name}' is not a string: {other:?}"),
            None => Err(anyhow!("missing field '{name}'")),
        }
    }

    pub fn boolean(&self, name: &str) -> Result<bool> {
        match self.fields.get(name) {
            Some(FieldValue::BooleanValue(value)) => Ok(*value),
            Some(other) => bail!("field '{name}' is not a boolean: {other:?}"),
            None => Err(anyhow!("missing field '{name}'")),
        }
    }

    /// `None` when the field is absent; an error when it has another type.
    pub fn timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        match self.fields.get(name) {
            None => Ok(None),
            Some(value) => value
                .as_timestamp()
                .map(Some)
                .with_context(|| format!("field '{name}' is not a timestamp: {value:?}")),
        }
    }
}

/// A user-scoped collection: `users/{uid}/{collection_id}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPath {
    parent: String,
    collection_id: String,
}

impl CollectionPath {
    pub fn for_user(user: &UserId, collection_id: &str) -> Self {
        Self {
            parent: format!("users/{}", user.as_str()),
            collection_id: collection_id.to_string(),
        }
    }

    /// Path of the owning document (`users/{uid}`).
    pub fn parent(&self) -> &str {
        &self.parent
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn path(&self) -> String {
        format!("{}/{}", self.parent, self.collection_id)
    }
}

impl std::fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.parent, self.collection_id)
    }
}

/// Reject ids that could escape their collection when used in a path or URL.
pub fn validate_document_id(id: &str) -> Result<()> {
    if id.is_empty() {
        bail!("Document id must not be empty");
    }
    if id.contains('/') || id.contains('\\') || id.contains("..") || id.contains('?') {
        bail!("Invalid document id: '{id}'");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn test_field_value_uses_firestore_shape() {
        let at = Utc.with_ymd_and_hms(2024, 3, 3, 10, 0, 0).unwrap();
        let mut fields = Fields::new();
        fields.insert("text".into(), FieldValue::string("hi"));
        fields.insert("completed".into(), FieldValue::BooleanValue(false));
        fields.insert("createdAt".into(), FieldValue::TimestampValue(at));

        let value = serde_json::to_value(&fields).unwrap();
        assert_eq!(
            value,
            json!({
                "completed": {"booleanValue": false},
                "createdAt": {"timestampValue": "2024-03-03T10:00:00Z"},
                "text": {"stringValue": "hi"}
            })
        );
    }

    #[test]
    fn test_field_value_parses_fractional_timestamps() {
        let value: FieldValue =
            serde_json::from_value(json!({"timestampValue": "2024-03-03T10:00:00.123456Z"}))
                .unwrap();
        let at = value.as_timestamp().unwrap();
        assert_eq!(at.timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn test_document_accessors() {
        let mut fields = Fields::new();
        fields.insert("text".into(), FieldValue::string("hi"));
        fields.insert("done".into(), FieldValue::BooleanValue(true));
        let doc = Document {
            id: "d1".into(),
            fields,
        };

        assert_eq!(doc.string("text").unwrap(), "hi");
        assert!(doc.boolean("done").unwrap());
        assert!(doc.string("done").is_err());
        assert!(doc.string("missing").is_err());
        assert_eq!(doc.timestamp("createdAt").unwrap(), None);
        assert!(doc.timestamp("text").is_err());
    }

    #[test]
    fn test_collection_path() {
        let user = UserId::new("u42").unwrap();
        let path = CollectionPath::for_user(&user, ENTRIES_COLLECTION);
        assert_eq!(path.parent(), "users/u42");
        assert_eq!(path.collection_id(), "entries");
        assert_eq!(path.path(), "users/u42/entries");
        assert_eq!(path.to_string(), "users/u42/entries");
    }

    #[test]
    fn test_validate_document_id() {
        assert!(validate_document_id("01HQZX").is_ok());
        assert!(validate_document_id("").is_err());
        assert!(validate_document_id("a/b").is_err());
        assert!(validate_document_id("..").is_err());
    }
}
