//! Password store enumeration.
//!
//! Walks the store root, keeps files whose name matches the configured glob
//! and maps each one to a display name. The walk is lazy; only the root is
//! checked up front so that a missing store fails before any UI opens.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Result, StoreError};

mod entry;

pub use entry::{display_name, relative_path, StoreEntry, ENCRYPTED_SUFFIX};

/// Index over a password store directory.
#[derive(Debug, Clone)]
pub struct StoreIndex {
    root: PathBuf,
    pattern: glob::Pattern,
    separator: String,
}

impl StoreIndex {
    /// Create an index for `root`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidPattern` if `pattern` is not a valid glob.
    pub fn new(root: impl Into<PathBuf>, pattern: &str, separator: &str) -> Result<Self> {
        let pattern = glob::Pattern::new(pattern).map_err(|e| StoreError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            root: root.into(),
            pattern,
            separator: separator.to_string(),
        })
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Separator used between path components in display names.
    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Enumerate matching entries below the root.
    ///
    /// Order follows the directory walk and is not sorted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` if the root does not exist, is not a
    /// directory, or cannot be read.
    pub fn enumerate(&self) -> Result<Entries<'_>> {
        self.check_root()?;
        debug!(root = %self.root.display(), pattern = %self.pattern, "enumerating store");

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(not_git_dir as WalkFilter);

        Ok(Entries {
            index: self,
            walker,
        })
    }

    /// Collect all entries into a display name → path map.
    pub fn entries(&self) -> Result<BTreeMap<String, PathBuf>> {
        let map: BTreeMap<_, _> = self
            .enumerate()?
            .map(|e| (e.display_name, e.path))
            .collect();
        debug!(count = map.len(), "store entries collected");
        Ok(map)
    }

    /// Absolute path an entry with `display_name` would have.
    ///
    /// Only `.gpg` is stripped from display names, so the suffix is put
    /// back only when the suffixed file name is what the pattern matches.
    pub fn path_for(&self, display_name: &str) -> PathBuf {
        let encrypted = relative_path(display_name, &self.separator);
        let matches = encrypted
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.pattern.matches(name));
        if matches {
            return self.root.join(encrypted);
        }
        let plain: PathBuf = display_name.split(self.separator.as_str()).collect();
        self.root.join(plain)
    }

    fn check_root(&self) -> Result<()> {
        let unavailable = |reason: String| StoreError::Unavailable {
            path: self.root.clone(),
            reason,
        };

        let metadata = std::fs::metadata(&self.root).map_err(|e| unavailable(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(unavailable("not a directory".to_string()).into());
        }
        std::fs::read_dir(&self.root).map_err(|e| unavailable(e.to_string()))?;
        Ok(())
    }

    fn to_entry(&self, path: &Path) -> Option<StoreEntry> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let name = display_name(relative, &self.separator)?;
        Some(StoreEntry {
            path: path.to_path_buf(),
            display_name: name,
        })
    }
}

type WalkFilter = fn(&walkdir::DirEntry) -> bool;

fn not_git_dir(entry: &walkdir::DirEntry) -> bool {
    entry.depth() == 0 || entry.file_name() != ".git"
}

/// Lazy iterator over store entries.
pub struct Entries<'a> {
    index: &'a StoreIndex,
    walker: walkdir::FilterEntry<walkdir::IntoIter, WalkFilter>,
}

impl Iterator for Entries<'_> {
    type Item = StoreEntry;

    fn next(&mut self) -> Option<StoreEntry> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable store path");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
                continue;
            };
            if !self.index.pattern.matches(file_name) {
                continue;
            }
            if let Some(store_entry) = self.index.to_entry(entry.path()) {
                return Some(store_entry);
            }
        }
    }
}
