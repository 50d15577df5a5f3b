//! Who is signed in, and the providers that can answer that.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use daybook_core::{Credentials, JournalError, UserId};
use daybook_store::{atomic_write, ensure_private_dir, with_file_lock};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};
use ulid::Ulid;

/// Tokens this close to expiry are refreshed before use.
const REFRESH_MARGIN_SECS: i64 = 300;

const ACCOUNTS_FILE: &str = "accounts.toml";
const ACCOUNTS_LOCK: &str = "accounts.lock";

pub(crate) const EMAIL_IN_USE: &str = "The email address is already in use by another account.";
pub(crate) const BAD_CREDENTIALS: &str = "The email or password is incorrect.";

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
    /// Bearer token for remote stores. Local accounts have none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl Identity {
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|at| at - now < Duration::seconds(REFRESH_MARGIN_SECS))
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |token: &Option<String>| token.as_ref().map(|_| "***");
        f.debug_struct("Identity")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("id_token", &redact(&self.id_token))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Account creation and password sign-in.
///
/// Provider rejections surface as `JournalError::Auth` carrying the
/// provider's message; transport failures stay plain `anyhow` errors.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity>;

    /// Renew an identity whose token is about to expire.
    async fn refresh(&self, identity: &Identity) -> Result<Identity>;
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AccountsFile {
    #[serde(default)]
    accounts: Vec<AccountRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AccountRecord {
    user_id: UserId,
    email: String,
    salt: String,
    password_sha256: String,
    created_at: DateTime<Utc>,
}

impl AccountRecord {
    fn matches_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// Accounts kept in `{state}/accounts.toml` for the local backend.
#[derive(Debug, Clone)]
pub struct LocalIdentityProvider {
    state_dir: PathBuf,
}

impl LocalIdentityProvider {
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            state_dir: state_dir.into(),
        }
    }

    fn read_accounts(&self) -> Result<AccountsFile> {
        let path = accounts_path(&self.state_dir);
        if !path.exists() {
            return Ok(AccountsFile::default());
        }
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read accounts: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse accounts: {}", path.display()))
    }

    fn write_accounts(&self, accounts: &AccountsFile) -> Result<()> {
        let content = toml::to_string_pretty(accounts).context("Failed to serialize accounts")?;
        atomic_write(&accounts_path(&self.state_dir), content.as_bytes())
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn sign_up(&self, credentials: &Credentials) -> Result<Identity> {
        ensure_private_dir(&self.state_dir)?;
        let lock_path = self.state_dir.join(ACCOUNTS_LOCK);
        let record = with_file_lock(&lock_path, || {
            let mut file = self.read_accounts()?;
            if file
                .accounts
                .iter()
                .any(|a| a.matches_email(credentials.email()))
            {
                return Err(JournalError::Auth(EMAIL_IN_USE.to_string()).into());
            }
            let salt = Ulid::new().to_string();
            let record = AccountRecord {
                user_id: UserId::new(Ulid::new().to_string())?,
                email: credentials.email().trim().to_string(),
                password_sha256: password_digest(&salt, credentials.password()),
                salt,
                created_at: Utc::now(),
            };
            file.accounts.push(record.clone());
            self.write_accounts(&file)?;
            Ok(record)
        })?;
        info!(user_id = %record.user_id, "created local account");
        Ok(local_identity(&record))
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Identity> {
        let file = self.read_accounts()?;
        let record = file
            .accounts
            .iter()
            .find(|a| a.matches_email(credentials.email()))
            .filter(|a| password_digest(&a.salt, credentials.password()) == a.password_sha256)
            .ok_or_else(|| JournalError::Auth(BAD_CREDENTIALS.to_string()))?;
        debug!(user_id = %record.user_id, "local sign-in");
        Ok(local_identity(record))
    }

    async fn refresh(&self, identity: &Identity) -> Result<Identity> {
        Ok(identity.clone())
    }
}

fn local_identity(record: &AccountRecord) -> Identity {
    Identity {
        user_id: record.user_id.clone(),
        email: record.email.clone(),
        id_token: None,
        refresh_token: None,
        expires_at: None,
    }
}

fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Path of the accounts file for a given state directory.
pub fn accounts_path(state_dir: &Path) -> PathBuf {
    state_dir.join(ACCOUNTS_FILE)
}
