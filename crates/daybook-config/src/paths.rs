use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// XDG application name for config and state directories.
pub const APP_NAME: &str = "daybook";
/// Overrides both config and state roots (tests, portable installs).
pub const HOME_ENV: &str = "DAYBOOK_HOME";

const CONFIG_FILE_NAME: &str = "config.toml";

fn home_override() -> Option<PathBuf> {
    std::env::var_os(HOME_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn config_dir_in(home: Option<&Path>) -> Option<PathBuf> {
    if let Some(home) = home {
        return Some(home.join("config"));
    }
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
}

fn state_dir_in(home: Option<&Path>) -> Option<PathBuf> {
    if let Some(home) = home {
        return Some(home.join("state"));
    }
    // state_dir() is Linux-only; fall back to data_local_dir() elsewhere.
    directories::ProjectDirs::from("", "", APP_NAME).map(|dirs| {
        dirs.state_dir()
            .unwrap_or_else(|| dirs.data_local_dir())
            .to_path_buf()
    })
}

/// `~/.config/daybook`, or `$DAYBOOK_HOME/config`.
pub fn config_dir() -> Result<PathBuf> {
    config_dir_in(home_override().as_deref()).context("Failed to determine config directory")
}

/// `~/.local/state/daybook`, or `$DAYBOOK_HOME/state`.
pub fn state_dir() -> Result<PathBuf> {
    state_dir_in(home_override().as_deref()).context("Failed to determine state directory")
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}
