//! The signed-in session, persisted between command invocations.
//!
//! `{state}/session.toml` exists exactly while someone is signed in. Writes
//! go through `session.lock` and an atomic replace; the file is 0600.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use daybook_config::StoreBackend;
use daybook_core::JournalError;
use daybook_store::{atomic_write, ensure_private_dir, with_file_lock};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::identity::Identity;

const SESSION_FILE: &str = "session.toml";
const SESSION_LOCK: &str = "session.lock";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSession {
    pub backend: StoreBackend,
    pub signed_in_at: DateTime<Utc>,
    /// Set by a successful unlock; cleared by `lock`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlocked_at: Option<DateTime<Utc>>,
    pub identity: Identity,
}

impl AppSession {
    pub fn new(identity: Identity, backend: StoreBackend) -> Self {
        Self {
            backend,
            signed_in_at: Utc::now(),
            unlocked_at: None,
            identity,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked_at.is_some()
    }

    /// With the lock disabled every session counts as unlocked.
    pub fn ensure_unlocked(&self, lock_enabled: bool) -> Result<(), JournalError> {
        if lock_enabled && !self.is_unlocked() {
            return Err(JournalError::Locked);
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    state_dir: PathBuf,
}

impl SessionStore {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.state_dir.join(SESSION_FILE)
    }

    pub fn load(&self) -> Result<Option<AppSession>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session: {}", path.display()))?;
        let session = toml::from_str(&content)
            .with_context(|| format!("Failed to parse session: {}", path.display()))?;
        Ok(Some(session))
    }

    pub fn save(&self, session: &AppSession) -> Result<()> {
        ensure_private_dir(&self.state_dir)?;
        let content = toml::to_string_pretty(session).context("Failed to serialize session")?;
        self.locked(|path| atomic_write(path, content.as_bytes()))?;
        debug!(user_id = %session.identity.user_id, "saved session");
        Ok(())
    }

    /// Remove the session. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        if !self.state_dir.exists() {
            return Ok(false);
        }
        self.locked(|path| {
            if !path.exists() {
                return Ok(false);
            }
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove session: {}", path.display()))?;
            Ok(true)
        })
    }

    /// The current session for `backend`.
    ///
    /// A session created against another backend is not honored.
    pub fn require(&self, backend: StoreBackend) -> Result<AppSession> {
        let session = self.load()?.ok_or(JournalError::NotSignedIn)?;
        if session.backend != backend {
            warn!(
                session_backend = %session.backend,
                configured = %backend,
                "ignoring session from a different store backend"
            );
            return Err(JournalError::NotSignedIn.into());
        }
        Ok(session)
    }

    fn locked<T>(&self, f: impl FnOnce(&Path) -> Result<T>) -> Result<T> {
        let path = self.path();
        with_file_lock(&self.state_dir.join(SESSION_LOCK), || f(&path))
    }
}
