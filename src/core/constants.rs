//! Constants used throughout passmenu.
//!
//! Centralizes magic strings and default configuration values.

/// Application name, used for the config directory and commit footers.
pub const APP_NAME: &str = "passmenu";

/// Configuration file name inside the config directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "PASSMENU_CONFIG";

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PASSMENU_LOG";

/// Environment variable overriding the store root (shared with `pass`).
pub const STORE_DIR_ENV: &str = "PASSWORD_STORE_DIR";

/// Default store root relative to HOME.
pub const DEFAULT_STORE_DIR: &str = ".password-store";

/// Default glob pattern for encrypted entries.
pub const DEFAULT_PATTERN: &str = "*.gpg";

/// Default separator used in display names.
pub const DEFAULT_SEPARATOR: &str = "/";

/// Default clipboard lifetime in seconds.
pub const DEFAULT_CLIPBOARD_TIMEOUT: u64 = 30;

/// Default notification duration in milliseconds.
pub const DEFAULT_NOTIFICATION_MS: u64 = 3000;

/// Lock file created inside `.git` while a repository handle is open.
pub const LOCK_FILE: &str = "passmenu.lock";

/// Footer appended to every generated commit message.
pub const COMMIT_FOOTER: &str = "This commit was automatically generated by passmenu.";
