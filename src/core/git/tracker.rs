//! One commit per changed store file.
//!
//! Staging is always recomputed from a fresh status: anything left staged by
//! an interrupted run is unstaged first, then each working-tree change is
//! staged and committed on its own. History ends up as a per-file audit log.

use std::path::Path;

use tracing::{debug, info};

use super::{ChangeKind, Repository, RepositoryStatus, Signature, StatusEntry};
use crate::core::constants;
use crate::error::{GitError, Result};

/// A commit about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub path: String,
    pub message: String,
    pub signature: Signature,
}

impl CommitRecord {
    /// Build the record for a `kind` change to `path`.
    pub fn new(path: &str, kind: ChangeKind, signature: Signature) -> Self {
        Self {
            path: path.to_string(),
            message: format!(
                "{} password store file {}\n\n{}",
                kind.verb(),
                path,
                constants::COMMIT_FOOTER
            ),
            signature,
        }
    }

    /// First line of the message.
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or_default()
    }
}

/// Turns working-tree changes into commits.
pub struct ChangeTracker<'r> {
    repo: &'r mut Repository,
}

impl<'r> ChangeTracker<'r> {
    pub fn new(repo: &'r mut Repository) -> Self {
        Self { repo }
    }

    /// Commit every working-tree change, one commit per path.
    ///
    /// Returns the status snapshot the commits were made from; an empty
    /// snapshot means there was nothing to commit.
    ///
    /// # Errors
    ///
    /// Returns `GitError::UnsupportedStatus` for paths in a state with no
    /// commit verb (unmerged paths), `GitError::NoIdentity` without a
    /// configured identity, and `GitError::Command` if git fails.
    pub fn commit_all(&mut self) -> Result<RepositoryStatus> {
        let status = self.repo.status()?;
        self.unstage(&status)?;

        let status = self.repo.status()?;
        if status.is_empty() {
            debug!("no store changes to commit");
            return Ok(status);
        }

        let signature = self.repo.signature()?;
        let mut committed = 0;
        for entry in &status {
            let Some(kind) = entry.workdir else {
                continue;
            };
            self.commit(CommitRecord::new(&entry.path, kind, signature.clone()))?;
            committed += 1;
        }

        info!(commits = committed, "store changes committed");
        Ok(status)
    }

    /// Commit `path` if its working-tree change is `expected`.
    ///
    /// A different or missing change is a silent no-op: the caller's guess
    /// about what happened to the file was wrong, which is not an error.
    /// Returns whether a commit was made.
    pub fn commit_single(&mut self, path: &Path, expected: ChangeKind) -> Result<bool> {
        let relative = self.relative(path)?;
        let entry = self.repo.status_of(&relative)?;

        match entry {
            Some(StatusEntry {
                workdir: Some(kind),
                ..
            }) if kind == expected => {
                let signature = self.repo.signature()?;
                self.commit(CommitRecord::new(&relative, kind, signature))?;
                Ok(true)
            }
            other => {
                debug!(
                    path = %relative,
                    %expected,
                    actual = ?other.and_then(|e| e.workdir),
                    "status does not match, not committing"
                );
                Ok(false)
            }
        }
    }

    fn unstage(&self, status: &RepositoryStatus) -> Result<()> {
        let mut paths = Vec::new();
        for entry in status.iter().filter(|e| e.is_staged()) {
            paths.push(entry.path.as_str());
            if let Some(orig) = &entry.orig_path {
                paths.push(orig.as_str());
            }
        }
        if paths.is_empty() {
            return Ok(());
        }

        debug!(count = paths.len(), "unstaging leftover changes");
        let mut args = if self.repo.head()?.is_some() {
            vec!["reset", "-q", "HEAD", "--"]
        } else {
            vec!["rm", "--cached", "-q", "-r", "--ignore-unmatch", "--"]
        };
        args.extend(paths);
        self.repo.run(&args, &[])?;
        Ok(())
    }

    fn commit(&self, record: CommitRecord) -> Result<()> {
        debug!(path = %record.path, "committing store file");
        let env = record.signature.env();

        self.repo
            .run(["add", "--all", "--", record.path.as_str()], &[])?;
        // Path-limited so anything else sitting in the index stays out.
        self.repo.run(
            [
                "commit",
                "-q",
                "--only",
                "-m",
                record.message.as_str(),
                "--",
                record.path.as_str(),
            ],
            &env,
        )?;

        info!(summary = record.summary(), "committed");
        Ok(())
    }

    fn relative(&self, path: &Path) -> Result<String> {
        let relative = if path.is_absolute() {
            let workdir = self.repo.workdir();
            let canonical = path
                .parent()
                .and_then(|p| p.canonicalize().ok())
                .zip(path.file_name())
                .map(|(parent, name)| parent.join(name))
                .unwrap_or_else(|| path.to_path_buf());
            canonical
                .strip_prefix(workdir)
                .or_else(|_| path.strip_prefix(workdir))
                .map(Path::to_path_buf)
                .map_err(|_| {
                    GitError::Parse(format!(
                        "{} is outside the repository {}",
                        path.display(),
                        workdir.display()
                    ))
                })?
        } else {
            path.to_path_buf()
        };

        let parts: Vec<_> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Ok(parts.join("/"))
    }
}
