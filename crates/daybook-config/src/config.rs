//! User configuration (`~/.config/daybook/config.toml`).
//!
//! Every section is optional; a missing file yields the defaults, which use
//! the local store and a fail-open lock gate.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use daybook_core::Mood;
use serde::{Deserialize, Serialize};

use crate::paths;

pub const DEFAULT_UNLOCK_PROMPT: &str = "Unlock Your Journal";
pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://securetoken.googleapis.com/v1";
pub const DEFAULT_DATABASE: &str = "(default)";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaybookConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub lock: LockConfig,
    #[serde(default)]
    pub journal: JournalConfig,
}

/// Where entries, todos and accounts live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON files under the state directory.
    #[default]
    Local,
    /// Firebase Identity Toolkit + Cloud Firestore.
    Firestore,
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => write!(f, "local"),
            Self::Firestore => write!(f, "firestore"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    /// Web API key of the Firebase project.
    pub api_key: String,
    pub project_id: String,
    pub database: String,
    /// Base URLs; point these at the emulator suite for local testing.
    pub firestore_endpoint: String,
    pub identity_endpoint: String,
    pub token_endpoint: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            firestore_endpoint: DEFAULT_FIRESTORE_ENDPOINT.to_string(),
            identity_endpoint: DEFAULT_IDENTITY_ENDPOINT.to_string(),
            token_endpoint: DEFAULT_TOKEN_ENDPOINT.to_string(),
        }
    }
}

impl FirebaseConfig {
    pub fn redacted_api_key(&self) -> String {
        mask_secret(&self.api_key)
    }

    /// `{endpoint}/projects/{project}/databases/{database}/documents`
    pub fn documents_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.firestore_endpoint.trim_end_matches('/'),
            self.project_id,
            self.database
        )
    }
}

impl fmt::Debug for FirebaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirebaseConfig")
            .field("api_key", &self.redacted_api_key())
            .field("project_id", &self.project_id)
            .field("database", &self.database)
            .field("firestore_endpoint", &self.firestore_endpoint)
            .field("identity_endpoint", &self.identity_endpoint)
            .field("token_endpoint", &self.token_endpoint)
            .finish()
    }
}

/// What the lock gate does when the device cannot authenticate biometrically.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnavailablePolicy {
    /// Open the journal without a challenge.
    #[default]
    Allow,
    /// Keep the journal locked.
    Deny,
}

impl fmt::Display for UnavailablePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => write!(f, "allow"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LockConfig {
    /// Require `daybook unlock` after every sign-in.
    pub enabled: bool,
    pub on_unavailable: UnavailablePolicy,
    /// Verifier program run for the biometric challenge (e.g. `fprintd-verify`).
    pub command: Option<String>,
    pub args: Vec<String>,
    /// Optional program whose success means a biometric is enrolled.
    pub enrolled_command: Option<String>,
    pub enrolled_args: Vec<String>,
    pub prompt: String,
}

impl Default for LockConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            on_unavailable: UnavailablePolicy::Allow,
            command: None,
            args: Vec::new(),
            enrolled_command: None,
            enrolled_args: Vec::new(),
            prompt: DEFAULT_UNLOCK_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Mood preselected for `entry add` when `--mood` is omitted.
    pub default_mood: Mood,
}

impl DaybookConfig {
    /// Load from the default location; defaults when the file is absent.
    pub fn load() -> Result<Self> {
        let path = match paths::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(Self::default()),
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// A copy safe to print: secrets are masked.
    pub fn redacted(&self) -> Self {
        let mut shown = self.clone();
        shown.firebase.api_key = self.firebase.redacted_api_key();
        shown
    }

    /// Render the effective configuration with secrets masked.
    pub fn to_display_toml(&self) -> Result<String> {
        toml::to_string_pretty(&self.redacted()).context("Failed to serialize config")
    }

    pub fn default_template() -> String {
        r#"# Daybook configuration
# Location: ~/.config/daybook/config.toml ($DAYBOOK_HOME/config/config.toml)

[store]
backend = "local"        # "local" (files under the state dir) or "firestore"

# Required when backend = "firestore".
# [firebase]
# api_key = "AIza..."
# project_id = "my-journal"
# database = "(default)"
# firestore_endpoint = "https://firestore.googleapis.com/v1"
# identity_endpoint = "https://identitytoolkit.googleapis.com/v1"
# token_endpoint = "https://securetoken.googleapis.com/v1"

[lock]
enabled = true
on_unavailable = "allow" # "allow" opens the journal when no biometric is available, "deny" keeps it locked
# command = "fprintd-verify"
# args = []
# enrolled_command = "fprintd-list"
# enrolled_args = ["$USER"]
prompt = "Unlock Your Journal"

[journal]
default_mood = "happy"
"#
        .to_string()
    }

    /// Write the template, refusing to overwrite unless `force`.
    pub fn save_default_template(path: &Path, force: bool) -> Result<PathBuf> {
        if path.exists() && !force {
            anyhow::bail!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        std::fs::write(path, Self::default_template())
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(path.to_path_buf())
    }
}

fn mask_secret(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{visible}***")
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
