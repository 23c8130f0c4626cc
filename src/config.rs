//! Configuration for curator.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (CURATOR_HOME, FIRECRAWL_API_KEY)
//! 2. Config file (<config dir>/config.yaml)
//! 3. Defaults (~/.curator, output to ./curated, cache enabled)
//!
//! The config is read once per invocation. The only write is
//! [`Config::save_api_key`], used after prompting for a missing key.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::adapters::firecrawl::DEFAULT_API_URL;

/// Config file name inside the config directory
pub const CONFIG_FILE: &str = "config.yaml";

/// Cache file name inside the config directory
pub const CACHE_FILE: &str = "cache.json";

/// Output directory used when none is configured
pub const DEFAULT_OUTPUT_DIR: &str = "curated";

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Where curated directories go (relative to the working directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,

    /// Whether to consult and update the URL cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,

    /// Firecrawl API root (self-hosted instances)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding config.yaml and cache.json
    config_dir: PathBuf,
    /// Contents of config.yaml (defaults if absent)
    file: ConfigFile,
    /// API key from the environment, which wins over the file
    env_api_key: Option<String>,
}

impl Config {
    /// Load configuration from the default locations
    pub fn load() -> Result<Self> {
        let config_dir = match std::env::var("CURATOR_HOME") {
            Ok(home) if !home.is_empty() => PathBuf::from(home),
            _ => dirs::home_dir()
                .context("Failed to determine home directory")?
                .join(".curator"),
        };

        let env_api_key = std::env::var("FIRECRAWL_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self::load_from(config_dir, env_api_key)
    }

    /// Load configuration from an explicit directory
    pub fn load_from(config_dir: impl Into<PathBuf>, env_api_key: Option<String>) -> Result<Self> {
        let config_dir = config_dir.into();
        let path = config_dir.join(CONFIG_FILE);

        let file = if path.exists() {
            load_config_file(&path)?
        } else {
            ConfigFile::default()
        };

        Ok(Self {
            config_dir,
            file,
            env_api_key,
        })
    }

    /// The Firecrawl API key, if any source provides one
    pub fn api_key(&self) -> Option<&str> {
        self.env_api_key
            .as_deref()
            .or(self.file.api_key.as_deref())
            .filter(|key| !key.trim().is_empty())
    }

    /// Firecrawl API root
    pub fn api_url(&self) -> &str {
        self.file.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Base directory for curated content
    pub fn default_output_dir(&self) -> PathBuf {
        PathBuf::from(self.file.output_dir.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR))
    }

    pub fn is_cache_enabled(&self) -> bool {
        self.file.cache.unwrap_or(true)
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn cache_path(&self) -> PathBuf {
        self.config_dir.join(CACHE_FILE)
    }

    /// Store an API key in config.yaml, keeping the other settings
    pub fn save_api_key(&mut self, api_key: impl Into<String>) -> Result<()> {
        self.file.api_key = Some(api_key.into());

        std::fs::create_dir_all(&self.config_dir).with_context(|| {
            format!(
                "Failed to create config directory: {}",
                self.config_dir.display()
            )
        })?;

        let path = self.config_path();
        let content = serde_yaml::to_string(&self.file).context("Failed to serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    // An empty file is a valid, empty config
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}
