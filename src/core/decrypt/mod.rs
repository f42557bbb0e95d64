//! Decryption backends.
//!
//! The engine treats decryption as an opaque capability: hand it the path of
//! an encrypted entry, get plaintext back or an error carrying the backend's
//! exit code.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Decryptor` trait
//! 2. Add the implementation in a new file (e.g., `age.rs`)
//! 3. Re-export from this module

use std::path::Path;

use crate::error::DecryptError;

mod gpg;

pub use gpg::Gpg;

/// Decryption capability.
pub trait Decryptor: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Decrypt the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns `DecryptError::Failed` with the backend's exit code when the
    /// backend rejects the file (wrong key, missing agent, corrupt data).
    fn decrypt(&self, path: &Path) -> Result<String, DecryptError>;
}
