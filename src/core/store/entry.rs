//! Store entries and display-name mapping.

use std::path::{Component, Path, PathBuf};

/// File extension of encrypted store entries, stripped from display names.
pub const ENCRYPTED_SUFFIX: &str = ".gpg";

/// A single encrypted file in the password store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreEntry {
    /// Absolute path of the encrypted file.
    pub path: PathBuf,
    /// Human-facing name derived from the path relative to the store root.
    pub display_name: String,
}

/// Map a path relative to the store root to its display name.
///
/// Components are joined with `separator` and a trailing `.gpg` is removed.
/// Returns `None` for paths that escape the root or are not valid UTF-8.
pub fn display_name(relative: &Path, separator: &str) -> Option<String> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if parts.is_empty() {
        return None;
    }

    let joined = parts.join(separator);
    let name = joined
        .strip_suffix(ENCRYPTED_SUFFIX)
        .filter(|stem| !stem.is_empty())
        .unwrap_or(&joined);
    Some(name.to_string())
}

/// Inverse of [`display_name`] for `.gpg` entries: the path relative to the
/// store root, with the suffix appended.
pub fn relative_path(display_name: &str, separator: &str) -> PathBuf {
    let mut path: PathBuf = display_name.split(separator).collect();
    let file_name = format!(
        "{}{}",
        path.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ENCRYPTED_SUFFIX
    );
    path.set_file_name(file_name);
    path
}
