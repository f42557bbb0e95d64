//! Configuration file management.
//!
//! Reads and validates `passmenu.toml`. Every field has a default, so a
//! missing file at the default location yields a working configuration for a
//! standard `~/.password-store`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Password store location and presentation.
    pub store: StoreConfig,
    /// Decryption backend settings.
    pub gpg: GpgConfig,
    /// Version-control settings.
    pub git: GitConfig,
    /// Notification settings.
    pub notifications: NotificationConfig,
}

/// `[store]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store root. `~` is expanded; `PASSWORD_STORE_DIR` takes precedence.
    pub path: Option<PathBuf>,
    /// Glob pattern matched against file names at every depth.
    pub pattern: String,
    /// Separator placed between path components in display names.
    pub separator: String,
    /// Only copy the first line of a decrypted entry.
    pub first_line_only: bool,
    /// Seconds before the clipboard is cleared.
    pub clipboard_timeout: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: None,
            pattern: constants::DEFAULT_PATTERN.to_string(),
            separator: constants::DEFAULT_SEPARATOR.to_string(),
            first_line_only: true,
            clipboard_timeout: constants::DEFAULT_CLIPBOARD_TIMEOUT,
        }
    }
}

/// `[gpg]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GpgConfig {
    /// gpg executable name or path.
    pub executable: String,
    /// Extra arguments passed before `--decrypt`.
    pub extra_args: Vec<String>,
}

impl Default for GpgConfig {
    fn default() -> Self {
        Self {
            executable: "gpg".to_string(),
            extra_args: Vec::new(),
        }
    }
}

/// `[git]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    /// Track and sync the store through git.
    pub enabled: bool,
    /// Remote to sync with instead of the branch's tracked remote.
    pub remote: Option<String>,
    /// Fetch refspecs instead of the remote's configured ones.
    pub refspecs: Vec<String>,
    /// SSH identity file used for `ssh://` and `user@host:path` remotes.
    pub ssh_key: Option<PathBuf>,
    /// Commit pending store changes before syncing.
    pub auto_commit: bool,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remote: None,
            refspecs: Vec::new(),
            ssh_key: None,
            auto_commit: true,
        }
    }
}

/// `[notifications]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub enabled: bool,
    /// How long a notification stays visible.
    pub duration_ms: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_ms: constants::DEFAULT_NOTIFICATION_MS,
        }
    }
}

impl Config {
    /// Default config file path (`<config_dir>/passmenu/config.toml`).
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::NoDirectory("config"))?;
        Ok(dir.join(constants::APP_NAME).join(constants::CONFIG_FILE))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. The default path may be absent, in which
    /// case defaults are used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse` for unreadable
    /// or malformed files, and `ConfigError::InvalidValue` on validation
    /// failure.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config = match explicit {
            Some(path) => Self::read(path)?,
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::read(&path)?
                } else {
                    debug!(path = %path.display(), "no config file, using defaults");
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<()> {
        if self.store.pattern.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.pattern",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if let Err(e) = glob::Pattern::new(&self.store.pattern) {
            return Err(ConfigError::InvalidValue {
                field: "store.pattern",
                reason: e.to_string(),
            }
            .into());
        }
        if self.store.separator.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "store.separator",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        if self.store.clipboard_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                field: "store.clipboard_timeout",
                reason: "must be at least one second".to_string(),
            }
            .into());
        }
        if self.gpg.executable.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "gpg.executable",
                reason: "must not be empty".to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Resolved store root.
    ///
    /// Precedence: `PASSWORD_STORE_DIR`, then `store.path`, then
    /// `~/.password-store`.
    pub fn store_root(&self) -> Result<PathBuf> {
        if let Some(dir) = std::env::var_os(constants::STORE_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }

        match &self.store.path {
            Some(path) => expand_home(path),
            None => {
                let home = dirs::home_dir().ok_or(ConfigError::NoDirectory("home"))?;
                Ok(home.join(constants::DEFAULT_STORE_DIR))
            }
        }
    }

    /// Clipboard lifetime as a duration.
    pub fn clipboard_ttl(&self) -> Duration {
        Duration::from_secs(self.store.clipboard_timeout)
    }
}

/// Expand a leading `~` to the home directory.
pub fn expand_home(path: &Path) -> Result<PathBuf> {
    match path.strip_prefix("~") {
        Ok(rest) => {
            let home = dirs::home_dir().ok_or(ConfigError::NoDirectory("home"))?;
            Ok(home.join(rest))
        }
        Err(_) => Ok(path.to_path_buf()),
    }
}
