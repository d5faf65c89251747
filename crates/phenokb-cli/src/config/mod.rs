//! Configuration loading for the Phenokb console.
//! Reads phenokb.toml from the current directory or the path in the
//! PHENOKB_CONFIG env var; a missing file falls back to defaults, so the
//! console works out of the box against a local service.

use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub downloads: DownloadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String { "http://localhost:8080/api".to_string() }

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { base_url: default_base_url() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Directory for downloaded configuration archives.
    #[serde(default = "default_download_dir")]
    pub dir: String,
}

fn default_download_dir() -> String { ".".to_string() }

impl Default for DownloadConfig {
    fn default() -> Self {
        Self { dir: default_download_dir() }
    }
}


impl Config {
    /// Load configuration. Precedence: explicit path, then PHENOKB_CONFIG,
    /// then ./phenokb.toml; a missing file yields the defaults.
    pub fn load(override_path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match override_path {
            Some(p) => p.to_path_buf(),
            None => std::env::var("PHENOKB_CONFIG")
                .unwrap_or_else(|_| "phenokb.toml".to_string())
                .into(),
        };

        if !path.exists() {
            if override_path.is_some() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
