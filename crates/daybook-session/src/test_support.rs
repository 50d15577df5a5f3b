use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use anyhow::{Result, bail};
use async_trait::async_trait;
use daybook_core::UserId;
use daybook_store::{CollectionPath, Document, DocumentStore, Fields, LocalDocumentStore};
use tempfile::TempDir;

/// Local store whose reads or writes can be made to fail, counting calls.
pub(crate) struct FlakyStore {
    inner: LocalDocumentStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyStore {
    pub fn new(dir: &TempDir) -> Arc<Self> {
        Arc::new(Self {
            inner: LocalDocumentStore::new(dir.path().to_path_buf()),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        })
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn write_attempt(&self) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            bail!("simulated write failure");
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn add(&self, collection: &CollectionPath, fields: Fields) -> Result<String> {
        self.write_attempt()?;
        self.inner.add(collection, fields).await
    }

    async fn list_newest_first(
        &self,
        collection: &CollectionPath,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            bail!("simulated read failure");
        }
        self.inner.list_newest_first(collection, order_field).await
    }

    async fn update(&self, collection: &CollectionPath, id: &str, fields: Fields) -> Result<()> {
        self.write_attempt()?;
        self.inner.update(collection, id, fields).await
    }

    async fn delete(&self, collection: &CollectionPath, id: &str) -> Result<()> {
        self.write_attempt()?;
        self.inner.delete(collection, id).await
    }
}

pub(crate) fn test_user() -> UserId {
    UserId::new("u-test").unwrap()
}
