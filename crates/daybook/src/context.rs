//! Everything a command needs: config, state location, and the session.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use daybook_config::{DaybookConfig, StoreBackend, paths, validate_config};
use daybook_core::JournalError;
use daybook_session::{
    AppSession, BiometricGate, FirebaseAuthClient, IdentityProvider, JournalBook,
    LocalIdentityProvider, SessionStore, TodoBoard,
};
use daybook_store::{
    DocumentStore, EntryRepository, FirestoreStore, LocalDocumentStore, TodoRepository,
};
use tracing::debug;

const STORE_DIR: &str = "store";

pub(crate) struct AppContext {
    pub config: DaybookConfig,
    pub state_dir: PathBuf,
    pub sessions: SessionStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let config = DaybookConfig::load()?;
        validate_config(&config)?;
        let state_dir = paths::state_dir()?;
        debug!(state_dir = %state_dir.display(), backend = %config.store.backend, "context ready");
        Ok(Self {
            sessions: SessionStore::new(state_dir.clone()),
            config,
            state_dir,
        })
    }

    pub fn backend(&self) -> StoreBackend {
        self.config.store.backend
    }

    pub fn identity_provider(&self) -> Box<dyn IdentityProvider> {
        match self.backend() {
            StoreBackend::Local => Box::new(LocalIdentityProvider::new(self.state_dir.clone())),
            StoreBackend::Firestore => Box::new(FirebaseAuthClient::new(&self.config.firebase)),
        }
    }

    pub fn gate(&self) -> BiometricGate {
        BiometricGate::from_config(&self.config.lock)
    }

    fn document_store(&self, session: &AppSession) -> Result<Arc<dyn DocumentStore>> {
        let store: Arc<dyn DocumentStore> = match self.backend() {
            StoreBackend::Local => {
                Arc::new(LocalDocumentStore::new(self.state_dir.join(STORE_DIR)))
            }
            StoreBackend::Firestore => {
                let token = session
                    .identity
                    .id_token
                    .clone()
                    .ok_or(JournalError::NotSignedIn)?;
                Arc::new(FirestoreStore::new(self.config.firebase.documents_url(), token))
            }
        };
        Ok(store)
    }

    /// The session journal and todo commands run under: signed in against
    /// the configured backend, unlocked when the lock is on, token fresh.
    pub async fn open_session(&self) -> Result<AppSession> {
        let mut session = self.sessions.require(self.backend())?;
        session.ensure_unlocked(self.config.lock.enabled)?;
        if session.identity.needs_refresh(Utc::now()) {
            session.identity = self
                .identity_provider()
                .refresh(&session.identity)
                .await?;
            self.sessions.save(&session)?;
        }
        Ok(session)
    }

    pub async fn journal(&self) -> Result<JournalBook> {
        let session = self.open_session().await?;
        let store = self.document_store(&session)?;
        let mut book = JournalBook::new(EntryRepository::for_user(
            store,
            &session.identity.user_id,
        ));
        book.load().await?;
        Ok(book)
    }

    pub async fn todo_board(&self) -> Result<TodoBoard> {
        let session = self.open_session().await?;
        let store = self.document_store(&session)?;
        let mut board = TodoBoard::new(TodoRepository::for_user(
            store,
            &session.identity.user_id,
        ));
        board.load().await?;
        Ok(board)
    }
}
