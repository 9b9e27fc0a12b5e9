//! Application configuration management.
//!
//! This module handles loading and saving the application configuration,
//! which includes the backend host and the last used username.
//!
//! Configuration is stored at `~/.config/scanview/config.json`; the
//! backend host can be overridden with `SCANVIEW_BACKEND_HOST`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "scanview";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding the backend host
const BACKEND_HOST_ENV: &str = "SCANVIEW_BACKEND_HOST";

/// Default backend host when neither env nor config provides one
const DEFAULT_BACKEND_HOST: &str = "https://api.saferwall.com";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub backend_host: Option<String>,
    pub last_username: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Effective backend host: env var, then config, then default
    pub fn backend_host(&self) -> String {
        std::env::var(BACKEND_HOST_ENV)
            .ok()
            .or_else(|| self.backend_host.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND_HOST.to_string())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
