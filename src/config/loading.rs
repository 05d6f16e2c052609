//! Configuration loading functionality.
//!
//! Handles locating `sunwall.toml`, reading it, and falling back to defaults.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;
use crate::constants::{CONFIG_DIR_NAME, CONFIG_FILE_NAME};

/// Default configuration path, `$XDG_CONFIG_HOME/sunwall/sunwall.toml`.
pub fn get_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// Load configuration from the default path.
///
/// A missing file is not an error; the built-in defaults are used instead.
pub fn load() -> Result<Config> {
    let config_path = get_config_path()?;
    if !config_path.exists() {
        log_info!("No configuration file found, using defaults");
        return Ok(Config::default());
    }
    load_from_path(&config_path)
}

/// Load and validate the configuration stored at `path`.
pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

    let config = Config::from_toml_str(&content)
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    log_decorated!("Loaded configuration from {}", path.display());
    config.log_config();
    Ok(config)
}
