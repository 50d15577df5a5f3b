//! File-backed document store.
//!
//! Each collection is one JSON object mapping document id to fields:
//!
//! ```text
//! {state}/store/
//! └── users/
//!     └── {uid}/
//!         ├── entries.json
//!         ├── entries.lock   (flock for concurrent write protection)
//!         ├── todos.json
//!         └── todos.lock
//! ```
//!
//! Writes hold an exclusive lock on the collection's `.lock` file and replace
//! the JSON file via temp-file + rename, so readers never see a torn file and
//! need no lock.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use daybook_core::JournalError;
use serde_json::Value;
use tracing::{debug, warn};
use ulid::Ulid;

use crate::DocumentStore;
use crate::document::{CollectionPath, Document, Fields, validate_document_id};

type RawCollection = BTreeMap<String, Value>;

#[derive(Debug, Clone)]
pub struct LocalDocumentStore {
    root: PathBuf,
}

impl LocalDocumentStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_file(&self, collection: &CollectionPath) -> PathBuf {
        self.root
            .join(collection.parent())
            .join(format!("{}.json", collection.collection_id()))
    }

    fn lock_file(&self, collection: &CollectionPath) -> PathBuf {
        self.root
            .join(collection.parent())
            .join(format!("{}.lock", collection.collection_id()))
    }

    fn read_raw(&self, collection: &CollectionPath) -> Result<RawCollection> {
        let path = self.collection_file(collection);
        if !path.exists() {
            return Ok(RawCollection::new());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read collection: {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(RawCollection::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse collection: {}", path.display()))
    }

    fn write_raw(&self, collection: &CollectionPath, raw: &RawCollection) -> Result<()> {
        let path = self.collection_file(collection);
        let data = serde_json::to_vec_pretty(raw).context("Failed to serialize collection")?;
        atomic_write(&path, &data)
    }

    /// Acquire the collection's write lock, execute `f`, then release.
    fn with_write_lock<T>(
        &self,
        collection: &CollectionPath,
        f: impl FnOnce() -> Result<T>,
    ) -> Result<T> {
        let dir = self.root.join(collection.parent());
        ensure_private_dir(&dir)?;
        with_file_lock(&self.lock_file(collection), f)
    }
}

#[async_trait]
impl DocumentStore for LocalDocumentStore {
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String> {
        self.with_write_lock(collection, || {
            let mut raw = self.read_raw(collection)?;
            let id = Ulid::new().to_string();
            let value = serde_json::to_value(&fields).context("Failed to serialize fields")?;
            raw.insert(id.clone(), value);
            self.write_raw(collection, &raw)?;
            debug!(%collection, %id, "added document");
            Ok(id)
        })
    }

    async fn list_newest_first(
        &self,
        collection: &CollectionPath,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        let raw = self.read_raw(collection)?;
        let mut documents = Vec::with_capacity(raw.len());
        for (id, value) in raw {
            match serde_json::from_value::<Fields>(value) {
                Ok(fields) => documents.push(Document { id, fields }),
                Err(error) => {
                    warn!(%collection, %id, %error, "skipping undecodable document");
                }
            }
        }
        crate::sort_newest_first(&mut documents, order_field);
        Ok(documents)
    }

    async fn update(&self, collection: &CollectionPath, id: &str, fields: Fields) -> Result<()> {
        validate_document_id(id)?;
        self.with_write_lock(collection, || {
            let mut raw = self.read_raw(collection)?;
            let existing = raw.remove(id).ok_or_else(|| JournalError::NotFound {
                kind: "document",
                id: id.to_string(),
            })?;
            let mut merged: Fields = serde_json::from_value(existing)
                .with_context(|| format!("Failed to decode document '{id}' in {collection}"))?;
            merged.extend(fields);
            let value = serde_json::to_value(&merged).context("Failed to serialize fields")?;
            raw.insert(id.to_string(), value);
            self.write_raw(collection, &raw)?;
            debug!(%collection, %id, "updated document");
            Ok(())
        })
    }

    async fn delete(&self, collection: &CollectionPath, id: &str) -> Result<()> {
        validate_document_id(id)?;
        self.with_write_lock(collection, || {
            let mut raw = self.read_raw(collection)?;
            if raw.remove(id).is_some() {
                self.write_raw(collection, &raw)?;
                debug!(%collection, %id, "deleted document");
            }
            Ok(())
        })
    }
}

/// Hold an exclusive flock on `lock_path` while `f` runs.
pub fn with_file_lock<T>(lock_path: &Path, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let lock_file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("Failed to open lock file: {}", lock_path.display()))?;
    let mut lock = fd_lock::RwLock::new(lock_file);
    let _guard = lock
        .write()
        .map_err(|e| anyhow::anyhow!("Failed to acquire write lock {}: {e}", lock_path.display()))?;

    f()
}

/// Write data to a file atomically using temp-file + rename.
///
/// `NamedTempFile` is created 0600 on Unix, so the persisted file is too.
pub fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    let parent = target.parent().context("Target path has no parent")?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;

    std::io::Write::write_all(&mut tmp, data).context("Failed to write temp file")?;

    tmp.persist(target)
        .with_context(|| format!("Failed to persist to {}", target.display()))?;

    Ok(())
}

/// Create `dir` (and parents); a newly created leaf is restricted to 0700.
pub fn ensure_private_dir(dir: &Path) -> Result<()> {
    let existed = dir.exists();
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    if !existed {
        set_dir_mode_700(dir)?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_dir_mode_700(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
        .with_context(|| format!("failed to chmod 700: {}", path.display()))
}

#[cfg(not(unix))]
fn set_dir_mode_700(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
#[path = "local_tests.rs"]
mod tests;
