use anyhow::{Result, bail};

use crate::config::{DaybookConfig, StoreBackend};

/// Check settings that would otherwise fail later at the first remote call.
pub fn validate_config(config: &DaybookConfig) -> Result<()> {
    if config.store.backend == StoreBackend::Firestore {
        if config.firebase.api_key.trim().is_empty() {
            bail!("firebase.api_key is required when store.backend = \"firestore\"");
        }
        if config.firebase.project_id.trim().is_empty() {
            bail!("firebase.project_id is required when store.backend = \"firestore\"");
        }
        if config.firebase.database.trim().is_empty() {
            bail!("firebase.database cannot be empty");
        }
    }

    if let Some(command) = &config.lock.command {
        if command.trim().is_empty() {
            bail!("lock.command cannot be blank (remove it to disable the verifier)");
        }
    }
    if let Some(command) = &config.lock.enrolled_command {
        if command.trim().is_empty() {
            bail!("lock.enrolled_command cannot be blank");
        }
    }
    if config.lock.prompt.trim().is_empty() {
        bail!("lock.prompt cannot be empty");
    }

    Ok(())
}
