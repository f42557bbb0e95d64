//! GPG decryption backend.
//!
//! Decrypts store entries by invoking the `gpg` CLI, the same way `pass`
//! does. Key selection and passphrase prompts are left to gpg-agent.
//!
//! ## Requirements
//!
//! - `gpg` CLI must be installed
//! - The private key for the store's recipients must be in the keyring

use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, trace};

use super::Decryptor;
use crate::core::config::GpgConfig;
use crate::error::DecryptError;

/// Exit code reported when gpg was killed by a signal.
const SIGNAL_EXIT_CODE: i32 = -1;

/// GPG decryptor using the gpg CLI.
#[derive(Debug, Clone)]
pub struct Gpg {
    executable: String,
    extra_args: Vec<String>,
}

impl Gpg {
    /// Create a backend using `executable`.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            extra_args: Vec::new(),
        }
    }

    /// Create a backend from the `[gpg]` config section.
    pub fn from_config(config: &GpgConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    /// Check that the gpg executable can be found.
    pub fn is_available(&self) -> bool {
        which::which(&self.executable).is_ok()
    }
}

impl Default for Gpg {
    fn default() -> Self {
        Self::new("gpg")
    }
}

impl Decryptor for Gpg {
    fn name(&self) -> &'static str {
        "gpg"
    }

    fn decrypt(&self, path: &Path) -> Result<String, DecryptError> {
        debug!(path = %path.display(), "decrypting with gpg");

        let output = Command::new(&self.executable)
            .args(&self.extra_args)
            .args(["--decrypt", "--quiet", "--yes", "--compress-algo=none", "--no-encrypt-to"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| DecryptError::Spawn {
                program: self.executable.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let exit_code = output.status.code().unwrap_or(SIGNAL_EXIT_CODE);
            debug!(exit_code, "gpg decrypt failed");
            return Err(DecryptError::Failed { exit_code, stderr });
        }

        let plaintext = String::from_utf8(output.stdout).map_err(|_| DecryptError::Encoding)?;
        trace!(plaintext_len = plaintext.len(), "decrypted with gpg");
        Ok(plaintext)
    }
}
