//! Error types.
//!
//! Each concern has its own error enum; they compose into [`Error`] so the
//! CLI can match on the variant to pick a hint.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Decrypt(#[from] DecryptError),

    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("unable to determine {0} directory")]
    NoDirectory(&'static str),
}

/// Password store enumeration errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store root is missing or unreadable.
    #[error("password store unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },

    #[error("invalid match pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("no password store entry named '{0}'")]
    NotFound(String),
}

/// Errors returned by a [`Decryptor`](crate::core::decrypt::Decryptor).
#[derive(Error, Debug)]
pub enum DecryptError {
    /// The decryption process ran and exited unsuccessfully.
    #[error("decryption failed with exit code {exit_code}: {stderr}")]
    Failed { exit_code: i32, stderr: String },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("decrypted content is not valid UTF-8")]
    Encoding,
}

impl DecryptError {
    /// Exit code reported by the decryption process, if it ran at all.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::Failed { exit_code, .. } => Some(*exit_code),
            _ => None,
        }
    }
}

/// Delivery channel (clipboard) errors.
#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("no clipboard tool found (install wl-clipboard, xclip or xsel)")]
    Unavailable,

    #[error("clipboard command '{program}' failed: {reason}")]
    Command { program: String, reason: String },
}

/// Version-control backend errors.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("not a git repository: {0}")]
    NotARepository(PathBuf),

    #[error("repository is locked by another process ({0})")]
    Locked(PathBuf),

    #[error("git {command} failed: {stderr}")]
    Command { command: String, stderr: String },

    #[error("failed to run git: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("HEAD is detached; check out a branch first")]
    DetachedHead,

    #[error("branch '{0}' has no upstream configured")]
    NoUpstream(String),

    #[error("no commit identity configured (set user.name and user.email)")]
    NoIdentity,

    /// A status code outside the set the tracker knows how to describe.
    #[error("unsupported status '{code}' for {path}")]
    UnsupportedStatus { code: String, path: String },

    #[error("unexpected git output: {0}")]
    Parse(String),
}

/// Remote synchronization errors. None are retried automatically.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("fetch from '{remote}' failed: {reason}")]
    FetchFailed { remote: String, reason: String },

    #[error("{changes} uncommitted change(s) in the work tree; not rebasing")]
    DirtyWorkTree { changes: usize },

    #[error("rebasing '{local}' onto '{upstream}' hit a conflict; the rebase was aborted")]
    RebaseConflict { local: String, upstream: String },

    #[error("push to '{remote}' failed: {reason}")]
    PushFailed { remote: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
