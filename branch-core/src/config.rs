//! Client configuration management.
//!
//! Handles loading, saving, and accessing the client configuration: Branch
//! credentials, the API endpoint, and logging preferences. Configuration is
//! persisted as TOML on disk.

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_API_URL;
use crate::error::{BranchError, BranchResult};
use crate::platform::Platform;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Branch API credentials and endpoint.
    #[serde(default)]
    pub branch: BranchConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Branch API settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct BranchConfig {
    /// Access key identifying the Branch app (`key_live_...`).
    #[serde(default)]
    pub branch_key: String,

    /// Access secret, required for link updates.
    #[serde(default)]
    pub branch_secret: String,

    /// Base URL of the REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

// Manual impl so the secret never ends up in logs.
impl std::fmt::Debug for BranchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BranchConfig")
            .field("branch_key", &self.branch_key)
            .field("branch_secret", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for log files. If empty, uses default location.
    #[serde(default)]
    pub directory: String,

    /// Enable JSON structured logging output.
    #[serde(default)]
    pub json_output: bool,
}

// Default value functions for serde

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            branch_key: String::new(),
            branch_secret: String::new(),
            api_url: default_api_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
            json_output: false,
        }
    }
}

impl BranchConfig {
    /// Build a config for the production endpoint from a key/secret pair.
    pub fn new(branch_key: impl Into<String>, branch_secret: impl Into<String>) -> Self {
        Self {
            branch_key: branch_key.into(),
            branch_secret: branch_secret.into(),
            api_url: default_api_url(),
        }
    }

    /// Whether an access key is present.
    pub fn has_key(&self) -> bool {
        !self.branch_key.is_empty()
    }

    /// Fail unless an access key is configured.
    pub fn require_key(&self) -> BranchResult<()> {
        if self.has_key() {
            Ok(())
        } else {
            Err(BranchError::MissingConfig("branch.branch_key".into()))
        }
    }

    /// Fail unless both the access key and secret are configured.
    pub fn require_secret(&self) -> BranchResult<()> {
        self.require_key()?;
        if self.branch_secret.is_empty() {
            Err(BranchError::MissingConfig("branch.branch_secret".into()))
        } else {
            Ok(())
        }
    }
}

impl AppConfig {
    /// Load configuration from the default config file path.
    pub fn load_default() -> BranchResult<Self> {
        let path = Self::default_config_path()?;
        if path.exists() {
            Self::load_from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> BranchResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: AppConfig = toml::from_str(&contents)?;
        config.branch.api_url = Self::sanitize_api_url(&config.branch.api_url)?;
        Ok(config)
    }

    /// Save configuration to a specific file path.
    ///
    /// On Unix the file is made readable by its owner only, since it holds
    /// the access secret.
    pub fn save_to_file(&self, path: &Path) -> BranchResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)
            .map_err(|e| BranchError::Config(format!("failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        restrict_permissions(path)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> BranchResult<PathBuf> {
        let config_dir = Platform::config_dir()?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get the effective log directory, using the configured path or the default.
    pub fn effective_log_dir(&self) -> BranchResult<PathBuf> {
        if self.logging.directory.is_empty() {
            let data_dir = Platform::data_dir()?;
            Ok(data_dir.join("logs"))
        } else {
            Ok(PathBuf::from(&self.logging.directory))
        }
    }

    /// Normalize an API base URL.
    ///
    /// Trims whitespace and surrounding quotes, strips trailing slashes, and
    /// falls back to the production endpoint when empty. Anything without an
    /// http(s) scheme is rejected.
    pub fn sanitize_api_url(url: &str) -> BranchResult<String> {
        let trimmed = url.trim().trim_matches('"').trim();
        if trimmed.is_empty() {
            return Ok(default_api_url());
        }
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(BranchError::Config(format!(
                "api_url must start with http:// or https://: {trimmed}"
            )));
        }
        Ok(trimmed.trim_end_matches('/').to_string())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> BranchResult<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> BranchResult<()> {
    Ok(())
}
