//! Configuration loading and API base URL resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the API base URL
pub const API_URL_ENV_VAR: &str = "LESSONS_API_URL";

/// Environment variable overriding the config file location
pub const CONFIG_PATH_ENV_VAR: &str = "LESSONS_CONFIG";

/// Compiled defaults used when nothing else is configured
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub log_level: String,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

/// Logging section of the TOML config
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

fn default_log_level() -> String {
    CompiledDefaults::default().log_level
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_file: None,
        }
    }
}

/// Contents of `config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Write a TOML config file, creating parent directories as needed
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Reject anything that is not an absolute http(s) URL
pub fn validate_base_url(url: &str) -> Result<()> {
    let trimmed = url.trim();
    let rest = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"))
        .ok_or_else(|| {
            Error::Config(format!("API base URL must start with http:// or https://: {}", url))
        })?;
    if rest.is_empty() || rest.starts_with('/') {
        return Err(Error::Config(format!("API base URL has no host: {}", url)));
    }
    Ok(())
}

/// Config file candidates in lookup order
///
/// `$LESSONS_CONFIG` if set, then `<user config dir>/lessons/config.toml`,
/// then `/etc/lessons/config.toml` on Linux.
pub fn config_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Ok(path) = std::env::var(CONFIG_PATH_ENV_VAR) {
        candidates.push(PathBuf::from(path));
    }
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("lessons").join("config.toml"));
    }
    if cfg!(target_os = "linux") {
        candidates.push(PathBuf::from("/etc/lessons/config.toml"));
    }
    candidates
}

/// Fully resolved client settings
#[derive(Debug, Clone, PartialEq)]
pub struct ClientSettings {
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub logging: LoggingConfig,
}

/// Resolves the API base URL in priority order:
/// 1. Command-line argument (highest priority)
/// 2. `LESSONS_API_URL` environment variable
/// 3. TOML config file
/// 4. Compiled default (fallback)
///
/// A missing or unreadable config file is never fatal; it logs a warning
/// and falls through to the defaults.
#[derive(Debug, Clone, Default)]
pub struct ApiBaseResolver {
    cli_url: Option<String>,
    config_path: Option<PathBuf>,
}

impl ApiBaseResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cli_url(mut self, url: Option<String>) -> Self {
        self.cli_url = url;
        self
    }

    /// Use this file instead of the standard candidates
    pub fn with_config_path(mut self, path: Option<PathBuf>) -> Self {
        self.config_path = path;
        self
    }

    fn load_file_config(&self) -> TomlConfig {
        let candidates = match &self.config_path {
            Some(path) => vec![path.clone()],
            None => config_file_candidates(),
        };

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match load_toml_config(&path) {
                Ok(config) => {
                    debug!(path = %path.display(), "Loaded config file");
                    return config;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Ignoring unreadable config file");
                }
            }
        }
        TomlConfig::default()
    }

    /// Resolve all settings, validating the chosen base URL
    pub fn resolve(&self) -> Result<ClientSettings> {
        let defaults = CompiledDefaults::default();
        let file = self.load_file_config();

        let api_base_url = if let Some(url) = &self.cli_url {
            url.clone()
        } else if let Ok(url) = std::env::var(API_URL_ENV_VAR) {
            url
        } else if let Some(url) = &file.api_base_url {
            url.clone()
        } else {
            defaults.api_base_url
        };
        validate_base_url(&api_base_url)?;

        Ok(ClientSettings {
            api_base_url,
            timeout_secs: file.timeout_secs.unwrap_or(defaults.timeout_secs),
            logging: file.logging,
        })
    }
}
