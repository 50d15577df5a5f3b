//! Cloud Firestore REST backend.
//!
//! Talks to `{endpoint}/projects/{project}/databases/{db}/documents` with the
//! signed-in user's id token. Security rules on the project are expected to
//! restrict `users/{uid}/**` to that user.

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use daybook_core::JournalError;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::{DocumentStore, sort_newest_first};
use crate::document::{CollectionPath, Document, FieldValue, Fields, validate_document_id};

#[derive(Debug)]
pub struct FirestoreStore {
    documents_url: String,
    id_token: String,
    client: reqwest::Client,
}

impl FirestoreStore {
    pub fn new(documents_url: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            documents_url: documents_url.into().trim_end_matches('/').to_string(),
            id_token: id_token.into(),
            client: reqwest::Client::new(),
        }
    }

    fn collection_url(&self, collection: &CollectionPath) -> String {
        format!("{}/{}", self.documents_url, collection.path())
    }

    fn document_url(&self, collection: &CollectionPath, id: &str) -> String {
        format!("{}/{}", self.collection_url(collection), id)
    }
}

#[async_trait]
impl DocumentStore for FirestoreStore {
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String> {
        let url = self.collection_url(collection);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.id_token)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .with_context(|| format!("firestore create request failed for {collection}"))?;
        let body = read_success_body(response, "create").await?;
        let wire: WireDocument =
            serde_json::from_str(&body).context("failed to parse created document")?;
        let id = document_id_from_name(&wire.name)?;
        debug!(%collection, %id, "added document");
        Ok(id)
    }

    async fn list_newest_first(
        &self,
        collection: &CollectionPath,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        let url = format!("{}/{}:runQuery", self.documents_url, collection.parent());
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.id_token)
            .json(&run_query_body(collection.collection_id()))
            .send()
            .await
            .with_context(|| format!("firestore query failed for {collection}"))?;
        let body = read_success_body(response, "query").await?;
        let documents = documents_newest_first(&body, order_field)?;
        debug!(%collection, count = documents.len(), "fetched documents");
        Ok(documents)
    }

    async fn update(&self, collection: &CollectionPath, id: &str, fields: Fields) -> Result<()> {
        validate_document_id(id)?;
        let url = update_url(&self.document_url(collection, id), fields.keys());
        let response = self
            .client
            .patch(&url)
            .bearer_auth(&self.id_token)
            .json(&json!({ "fields": fields }))
            .send()
            .await
            .with_context(|| format!("firestore update request failed for {collection}/{id}"))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(JournalError::NotFound {
                kind: "document",
                id: id.to_string(),
            }
            .into());
        }
        read_success_body(response, "update").await?;
        debug!(%collection, %id, "updated document");
        Ok(())
    }

    async fn delete(&self, collection: &CollectionPath, id: &str) -> Result<()> {
        validate_document_id(id)?;
        let url = self.document_url(collection, id);
        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.id_token)
            .send()
            .await
            .with_context(|| format!("firestore delete request failed for {collection}/{id}"))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        read_success_body(response, "delete").await?;
        debug!(%collection, %id, "deleted document");
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct WireDocument {
    name: String,
    #[serde(default)]
    fields: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RunQueryItem {
    #[serde(default)]
    document: Option<WireDocument>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

async fn read_success_body(response: reqwest::Response, operation: &str) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .with_context(|| format!("failed to read firestore {operation} response"))?;
    if status.is_success() {
        return Ok(body);
    }
    bail!(
        "firestore {operation} failed ({status}): {}",
        api_error_message(&body)
    );
}

/// Provider message from an error body, or the raw body when unparseable.
pub(crate) fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) if !parsed.error.message.is_empty() => parsed.error.message,
        Ok(parsed) if !parsed.error.status.is_empty() => parsed.error.status,
        _ => body.trim().to_string(),
    }
}

/// Last path segment of a full resource name.
pub(crate) fn document_id_from_name(name: &str) -> Result<String> {
    match name.rsplit('/').next() {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => bail!("malformed document name: '{name}'"),
    }
}

/// Unordered query over the whole collection.
///
/// A server-side `orderBy` drops documents that lack the field, so ordering
/// happens after decoding.
pub(crate) fn run_query_body(collection_id: &str) -> Value {
    json!({
        "structuredQuery": {
            "from": [{ "collectionId": collection_id }]
        }
    })
}

/// PATCH URL that touches only `field_paths` and refuses to create.
pub(crate) fn update_url<'a>(
    document_url: &str,
    field_paths: impl Iterator<Item = &'a String>,
) -> String {
    let mut url = format!("{document_url}?currentDocument.exists=true");
    for path in field_paths {
        url.push_str("&updateMask.fieldPaths=");
        url.push_str(path);
    }
    url
}

fn decode_document(wire: WireDocument) -> Result<Document> {
    let id = document_id_from_name(&wire.name)?;
    let mut fields = Fields::new();
    for (name, value) in wire.fields {
        match serde_json::from_value::<FieldValue>(value) {
            Ok(value) => {
                fields.insert(name, value);
            }
            Err(error) => {
                debug!(%id, field = %name, %error, "ignoring field of unsupported type");
            }
        }
    }
    Ok(Document { id, fields })
}

pub(crate) fn parse_run_query_response(body: &str) -> Result<Vec<Document>> {
    let items: Vec<RunQueryItem> =
        serde_json::from_str(body).context("failed to parse firestore query response")?;
    let mut documents = Vec::with_capacity(items.len());
    for wire in items.into_iter().filter_map(|item| item.document) {
        match decode_document(wire) {
            Ok(doc) => documents.push(doc),
            Err(error) => warn!(%error, "skipping malformed document"),
        }
    }
    Ok(documents)
}

pub(crate) fn documents_newest_first(body: &str, order_field: &str) -> Result<Vec<Document>> {
    let mut documents = parse_run_query_response(body)?;
    sort_newest_first(&mut documents, order_field);
    Ok(documents)
}
