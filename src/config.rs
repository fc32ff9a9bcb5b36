use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CleanerError, Result};
use crate::query::QueryStyle;

/// Environment variable naming the configuration directory
pub const CONFIG_DIR_ENV: &str = "GMAIL_CLEANER_CONFIG_DIR";

/// Environment variable that opts into the full `https://mail.google.com/` scope
pub const FULL_SCOPE_ENV: &str = "GMAIL_REQUEST_DANGEROUS_FULL_AUTH_SCOPE";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub query: QueryStyle,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Abort without changes when the estimated match count exceeds this
    #[serde(default = "default_cap")]
    pub cap: u64,
    #[serde(default)]
    pub include_spam_trash: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            cap: default_cap(),
            include_spam_trash: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Request the full mail scope even when not deleting permanently
    #[serde(default)]
    pub request_full_scope: bool,
}

fn default_cap() -> u64 {
    500
}

impl Config {
    pub async fn load(path: &Path) -> Result<Self> {
        // If file doesn't exist, return default config with warning
        if !path.exists() {
            tracing::warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CleanerError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| CleanerError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.search.cap == 0 {
            return Err(CleanerError::Config(
                "search.cap must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Files kept in the configuration directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub dir: PathBuf,
    /// OAuth2 client secret downloaded from Google Cloud Console
    pub credentials: PathBuf,
    /// Cached access and refresh tokens
    pub token_cache: PathBuf,
    pub config_file: PathBuf,
}

impl ConfigPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            credentials: dir.join("credentials.json"),
            token_cache: dir.join("token.json"),
            config_file: dir.join("config.toml"),
            dir,
        }
    }

    /// Build paths from the `--config-dir` value; clap already falls back to
    /// the environment variable
    pub fn resolve(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(Self::new(dir)),
            _ => Err(CleanerError::Config(format!(
                "argument 'config-dir' is required (if not using environment variable {})",
                CONFIG_DIR_ENV
            ))),
        }
    }
}
