//! Working-tree status model.
//!
//! Parsed from `git status --porcelain=v1 -z`. Each entry carries the change
//! kind in the index and in the working tree separately.

use std::fmt;

use crate::error::{GitError, Result};

/// Kind of change to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    New,
    Modified,
    Deleted,
    Renamed,
    TypeChanged,
}

impl ChangeKind {
    /// Verb used in generated commit messages.
    pub fn verb(self) -> &'static str {
        match self {
            Self::New => "Add",
            Self::Modified => "Modify",
            Self::Deleted => "Delete",
            Self::Renamed => "Rename",
            Self::TypeChanged => "Change filetype for",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::New => "new",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::TypeChanged => "typechange",
        };
        f.write_str(name)
    }
}

/// Status of one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    /// Path relative to the repository root, `/`-separated.
    pub path: String,
    /// Source path of a staged rename.
    pub orig_path: Option<String>,
    /// Change staged in the index.
    pub index: Option<ChangeKind>,
    /// Change in the working tree relative to the index.
    pub workdir: Option<ChangeKind>,
}

impl StatusEntry {
    pub fn is_staged(&self) -> bool {
        self.index.is_some()
    }

    pub fn has_workdir_change(&self) -> bool {
        self.workdir.is_some()
    }

    /// A file git does not track yet (`??`).
    pub fn is_untracked(&self) -> bool {
        self.index.is_none() && self.workdir == Some(ChangeKind::New)
    }
}

/// Snapshot of working-tree status.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryStatus {
    entries: Vec<StatusEntry>,
}

impl RepositoryStatus {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, StatusEntry> {
        self.entries.iter()
    }

    /// Entry for `path`, if it has any change.
    pub fn get(&self, path: &str) -> Option<&StatusEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Parse `git status --porcelain=v1 -z` output.
    ///
    /// # Errors
    ///
    /// Returns `GitError::UnsupportedStatus` for codes outside the known
    /// change kinds (unmerged paths, copies) and `GitError::Parse` for
    /// malformed records.
    pub fn parse(output: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(output);
        let mut records = text.split('\0').filter(|r| !r.is_empty());
        let mut entries = Vec::new();

        while let Some(record) = records.next() {
            if record.len() < 4 || !record.is_char_boundary(3) || &record[2..3] != " " {
                return Err(GitError::Parse(format!("status record '{}'", record)).into());
            }
            let (x, y) = (record.as_bytes()[0], record.as_bytes()[1]);
            let path = record[3..].to_string();

            let index = index_kind(x, y, &path)?;
            let workdir = workdir_kind(x, y, &path)?;

            // Renames are followed by their source path as a separate record.
            let orig_path = if x == b'R' || y == b'R' {
                let source = records
                    .next()
                    .ok_or_else(|| GitError::Parse(format!("rename source for '{}'", path)))?;
                Some(source.to_string())
            } else {
                None
            };

            entries.push(StatusEntry {
                path,
                orig_path,
                index,
                workdir,
            });
        }

        Ok(Self { entries })
    }
}

impl<'a> IntoIterator for &'a RepositoryStatus {
    type Item = &'a StatusEntry;
    type IntoIter = std::slice::Iter<'a, StatusEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn unsupported(x: u8, y: u8, path: &str) -> GitError {
    GitError::UnsupportedStatus {
        code: format!("{}{}", x as char, y as char),
        path: path.to_string(),
    }
}

fn index_kind(x: u8, y: u8, path: &str) -> Result<Option<ChangeKind>> {
    let kind = match x {
        b' ' | b'?' => None,
        b'A' => Some(ChangeKind::New),
        b'M' => Some(ChangeKind::Modified),
        b'D' => Some(ChangeKind::Deleted),
        b'R' => Some(ChangeKind::Renamed),
        b'T' => Some(ChangeKind::TypeChanged),
        _ => return Err(unsupported(x, y, path).into()),
    };
    Ok(kind)
}

fn workdir_kind(x: u8, y: u8, path: &str) -> Result<Option<ChangeKind>> {
    let kind = match y {
        b' ' => None,
        b'?' if x == b'?' => Some(ChangeKind::New),
        // Intent-to-add entries show up as " A".
        b'A' => Some(ChangeKind::New),
        b'M' => Some(ChangeKind::Modified),
        b'D' => Some(ChangeKind::Deleted),
        b'R' => Some(ChangeKind::Renamed),
        b'T' => Some(ChangeKind::TypeChanged),
        _ => return Err(unsupported(x, y, path).into()),
    };
    Ok(kind)
}
