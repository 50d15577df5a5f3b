use anyhow::Result;
use tracing::warn;

use daybook_config::{DaybookConfig, paths, validate_config};

use crate::cli::OutputFormat;
use crate::output::print_json;

pub(crate) fn handle_config_init(force: bool) -> Result<()> {
    let path = paths::config_path()?;
    let written = DaybookConfig::save_default_template(&path, force)?;
    eprintln!("Wrote default configuration to: {}", written.display());
    Ok(())
}

/// Show the effective config even when it would fail validation.
pub(crate) fn handle_config_show(format: OutputFormat) -> Result<()> {
    let config = DaybookConfig::load()?;
    if let Err(err) = validate_config(&config) {
        warn!("Configuration is invalid: {err:#}");
    }

    match format {
        OutputFormat::Json => print_json(&config.redacted())?,
        OutputFormat::Text => print!("{}", config.to_display_toml()?),
    }
    Ok(())
}

pub(crate) fn handle_config_path() -> Result<()> {
    println!("{}", paths::config_path()?.display());
    Ok(())
}
