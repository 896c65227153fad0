//! Configuration management

use crate::error::{Error, Result};
use crate::types::Config;
use crate::utils::paths::{ensure_dir, get_config_path};
use std::env;
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

/// Overrides `base_url` from the config file
pub const BASE_URL_ENV: &str = "PX_GALLERY_BASE_URL";

/// Load configuration from the default location, merging with defaults
pub async fn load_config() -> Result<Config> {
    let config = load_config_from(&get_config_path()).await?;
    apply_overrides(config, env::var(BASE_URL_ENV).ok())
}

/// Load configuration from `path`; a missing file yields the defaults
pub async fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).await?;
    // Absent keys fall back to `Config::default()` via `#[serde(default)]`
    let config: Config = serde_json::from_str(&content)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Apply environment overrides and reject unusable values
pub fn apply_overrides(mut config: Config, base_url: Option<String>) -> Result<Config> {
    if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
        config.base_url = url;
    }

    if config.base_url.trim().is_empty() {
        return Err(Error::InvalidConfig("base_url must not be empty".into()));
    }
    if config.page_size == 0 {
        return Err(Error::InvalidConfig("page_size must be at least 1".into()));
    }
    if config.timeout_secs == 0 {
        return Err(Error::InvalidConfig("timeout_secs must be at least 1".into()));
    }

    Ok(config)
}

/// Save configuration to `path`
pub async fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).await?;
    }
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).await?;
    Ok(())
}

/// Open config file in editor
pub async fn edit_config(editor: &str) -> Result<()> {
    let config_path = get_config_path();

    // Ensure config file exists
    if !config_path.exists() {
        save_config_to(&Config::default(), &config_path).await?;
    }

    Command::new(editor).arg(&config_path).status().await?;

    Ok(())
}
