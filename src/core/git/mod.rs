//! Git-backed version control for the password store.
//!
//! [`Repository`] is the single handle through which every git operation
//! runs. It holds an exclusive advisory lock on a file inside `.git` while
//! open. The lock belongs to the open file, so the OS releases it on every
//! exit path, including a process killed by a signal. The file itself stays
//! behind and is reused.
//!
//! [`ChangeTracker`] and [`SyncCoordinator`] borrow the handle mutably,
//! which keeps their structural operations from ever overlapping. Callers
//! that share a handle across threads wrap it in a `Mutex`.

use std::ffi::OsStr;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use fs2::FileExt;
use tracing::{debug, trace, warn};

use crate::core::constants;
use crate::error::{GitError, Result};

mod status;
mod sync;
mod tracker;
mod transport;

pub use status::{ChangeKind, RepositoryStatus, StatusEntry};
pub use sync::{RebaseOutcome, RemoteOptions, SyncCoordinator, SyncOutcome, SyncState, Tracking};
pub use tracker::{ChangeTracker, CommitRecord};
pub use transport::{is_ssh_url, CredentialResolver, IdentityFile};

/// Environment variables that would redirect git away from our work tree.
const SCRUBBED_ENV: &[&str] = &["GIT_DIR", "GIT_WORK_TREE", "GIT_INDEX_FILE"];

/// Commit identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub email: String,
}

impl Signature {
    /// Environment that makes git use this identity as author and committer.
    pub fn env(&self) -> [(&'static str, &str); 4] {
        [
            ("GIT_AUTHOR_NAME", self.name.as_str()),
            ("GIT_AUTHOR_EMAIL", self.email.as_str()),
            ("GIT_COMMITTER_NAME", self.name.as_str()),
            ("GIT_COMMITTER_EMAIL", self.email.as_str()),
        ]
    }
}

/// Open handle on a git work tree.
pub struct Repository {
    workdir: PathBuf,
    git_dir: PathBuf,
    lock: File,
    credentials: Option<Box<dyn CredentialResolver>>,
}

impl std::fmt::Debug for Repository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("workdir", &self.workdir)
            .field("git_dir", &self.git_dir)
            .field("credentials", &self.credentials.is_some())
            .finish()
    }
}

impl Repository {
    /// Open the repository containing `path` and take its lock.
    ///
    /// # Errors
    ///
    /// Returns `GitError::NotARepository` if `path` is not inside a work
    /// tree and `GitError::Locked` if another handle holds the lock.
    pub fn open(path: &Path) -> Result<Self> {
        let output = git_command(path)
            .args(["rev-parse", "--show-toplevel", "--absolute-git-dir"])
            .output()
            .map_err(GitError::Spawn)?;
        if !output.status.success() {
            return Err(GitError::NotARepository(path.to_path_buf()).into());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let mut lines = stdout.lines();
        let (Some(workdir), Some(git_dir)) = (lines.next(), lines.next()) else {
            return Err(GitError::Parse(format!("rev-parse output '{}'", stdout.trim())).into());
        };
        let workdir = PathBuf::from(workdir);
        let git_dir = PathBuf::from(git_dir);

        let lock_path = git_dir.join(constants::LOCK_FILE);
        let lock = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;
        if let Err(e) = lock.try_lock_exclusive() {
            if e.raw_os_error() == fs2::lock_contended_error().raw_os_error() {
                return Err(GitError::Locked(lock_path).into());
            }
            return Err(e.into());
        }

        debug!(workdir = %workdir.display(), "repository opened");
        Ok(Self {
            workdir,
            git_dir,
            lock,
            credentials: None,
        })
    }

    /// Install the credential hook used for SSH remotes.
    pub fn set_credentials(&mut self, resolver: Box<dyn CredentialResolver>) {
        self.credentials = Some(resolver);
    }

    /// Root of the work tree.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Absolute `.git` directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Run git and return its output regardless of exit status.
    pub(crate) fn output<I, S>(&self, args: I, env: &[(&str, &str)]) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        trace!(?args, "running git");

        let output = git_command(&self.workdir)
            .args(&args)
            .envs(env.iter().copied())
            .stdin(Stdio::null())
            .output()
            .map_err(GitError::Spawn)?;
        Ok(output)
    }

    /// Run git and return trimmed stdout, failing on a non-zero exit.
    pub(crate) fn run<I, S>(&self, args: I, env: &[(&str, &str)]) -> Result<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<_> = args.into_iter().map(|a| a.as_ref().to_owned()).collect();
        let output = self.output(&args, env)?;
        if !output.status.success() {
            let command = args
                .first()
                .map(|a| a.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Err(GitError::Command {
                command,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Full working-tree status, untracked files listed individually.
    pub fn status(&self) -> Result<RepositoryStatus> {
        self.status_of_paths(&[])
    }

    /// Status of a single path, `None` when it is unchanged.
    pub fn status_of(&self, path: &str) -> Result<Option<StatusEntry>> {
        let status = self.status_of_paths(&[path])?;
        Ok(status.get(path).cloned())
    }

    fn status_of_paths(&self, paths: &[&str]) -> Result<RepositoryStatus> {
        let mut args = vec![
            "status",
            "--porcelain=v1",
            "-z",
            "--untracked-files=all",
            "--",
        ];
        args.extend_from_slice(paths);

        let output = self.output(&args, &[])?;
        if !output.status.success() {
            return Err(GitError::Command {
                command: "status".to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        RepositoryStatus::parse(&output.stdout)
    }

    /// Commit id HEAD points at, `None` on an unborn branch.
    pub fn head(&self) -> Result<Option<String>> {
        let output = self.output(["rev-parse", "--verify", "-q", "HEAD^{commit}"], &[])?;
        if !output.status.success() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
    }

    /// Short name of the checked-out branch.
    ///
    /// # Errors
    ///
    /// Returns `GitError::DetachedHead` when HEAD is not a branch.
    pub fn current_branch(&self) -> Result<String> {
        let output = self.output(["symbolic-ref", "--short", "-q", "HEAD"], &[])?;
        if !output.status.success() {
            return Err(GitError::DetachedHead.into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Single config value, `None` when unset.
    pub fn config_value(&self, key: &str) -> Result<Option<String>> {
        let output = self.output(["config", "--get", key], &[])?;
        if !output.status.success() {
            return Ok(None);
        }
        let value = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(value).filter(|v| !v.is_empty()))
    }

    /// Configured identity from `user.name` and `user.email`.
    ///
    /// # Errors
    ///
    /// Returns `GitError::NoIdentity` if either is unset.
    pub fn signature(&self) -> Result<Signature> {
        let name = self.config_value("user.name")?;
        let email = self.config_value("user.email")?;
        match (name, email) {
            (Some(name), Some(email)) => Ok(Signature { name, email }),
            _ => Err(GitError::NoIdentity.into()),
        }
    }

    /// Commits on HEAD not in `upstream`, and commits in `upstream` not on HEAD.
    pub fn ahead_behind(&self, upstream: &str) -> Result<(usize, usize)> {
        let range = format!("HEAD...{}", upstream);
        let counts = self.run(["rev-list", "--left-right", "--count", range.as_str()], &[])?;
        let mut parts = counts.split_whitespace().map(str::parse::<usize>);
        match (parts.next(), parts.next()) {
            (Some(Ok(ahead)), Some(Ok(behind))) => Ok((ahead, behind)),
            _ => Err(GitError::Parse(format!("rev-list counts '{}'", counts)).into()),
        }
    }

    /// Whether a rebase is stopped midway in this repository.
    pub fn rebase_in_progress(&self) -> bool {
        self.git_dir.join("rebase-merge").exists() || self.git_dir.join("rebase-apply").exists()
    }

    /// Environment for talking to `remote`, with SSH credentials if needed.
    pub(crate) fn remote_env(&self, remote: &str) -> Result<Vec<(&'static str, String)>> {
        let Some(resolver) = &self.credentials else {
            return Ok(Vec::new());
        };

        let url = self.run(["remote", "get-url", remote], &[])?;
        if !is_ssh_url(&url) {
            debug!(remote, "remote is not ssh, skipping credential hook");
            return Ok(Vec::new());
        }

        let command = resolver.ssh_command(&url)?;
        debug!(remote, "using ssh credential hook");
        Ok(vec![("GIT_SSH_COMMAND", command)])
    }
}

impl Drop for Repository {
    fn drop(&mut self) {
        // Closing the file would release the lock too; unlock explicitly to log failures.
        if let Err(e) = self.lock.unlock() {
            warn!(error = %e, "failed to release repository lock");
        } else {
            debug!("repository lock released");
        }
    }
}

fn git_command(dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.arg("-C").arg(dir);
    for var in SCRUBBED_ENV {
        cmd.env_remove(var);
    }
    cmd
}
