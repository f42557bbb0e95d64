//! Remote transport detection and SSH credentials.

use std::path::PathBuf;

use crate::error::Result;

/// Resolves credentials for SSH remotes.
///
/// Only consulted when the remote URL uses SSH transport.
pub trait CredentialResolver: Send + Sync {
    /// Value for `GIT_SSH_COMMAND` when talking to `url`.
    fn ssh_command(&self, url: &str) -> Result<String>;
}

/// Authenticate with a fixed SSH identity file.
#[derive(Debug, Clone)]
pub struct IdentityFile {
    path: PathBuf,
}

impl IdentityFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialResolver for IdentityFile {
    fn ssh_command(&self, _url: &str) -> Result<String> {
        let path = self.path.to_string_lossy().replace('\'', r"'\''");
        Ok(format!("ssh -i '{}' -o IdentitiesOnly=yes", path))
    }
}

/// Whether `url` uses SSH transport.
///
/// Recognizes explicit `ssh://` style schemes and the scp-like
/// `user@host:path` shorthand.
pub fn is_ssh_url(url: &str) -> bool {
    let url = url.trim();
    if let Some((scheme, _)) = url.split_once("://") {
        return matches!(scheme, "ssh" | "git+ssh" | "ssh+git");
    }

    // scp-like syntax: no slash before the first colon.
    let Some((prefix, path)) = url.split_once(':') else {
        return false;
    };
    if prefix.contains('/') || path.is_empty() {
        return false;
    }
    match prefix.split_once('@') {
        Some((user, host)) => !user.is_empty() && !host.is_empty(),
        None => false,
    }
}
