//! Fetch → rebase → push synchronization.
//!
//! History is reconciled by rebasing local commits onto the upstream branch,
//! never by merging. A rebase that does not complete cleanly is aborted on
//! the spot, so a failed sync leaves the branch exactly where it was.
//!
//! Nothing here retries. A failed fetch or push is reported and the caller
//! decides whether to run the whole sequence again.

use std::fmt;

use tracing::{debug, info, warn};

use super::Repository;
use crate::error::{GitError, Result, SyncError};

/// Where the coordinator is in a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
    Rebasing,
    Pushing,
    Aborted,
}

impl fmt::Display for SyncState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Rebasing => "rebasing",
            Self::Pushing => "pushing",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Remote settings consumed by the coordinator.
#[derive(Debug, Clone, Default)]
pub struct RemoteOptions {
    /// Remote to use instead of the branch's tracked remote.
    pub remote: Option<String>,
    /// Fetch refspecs instead of the remote's configured ones.
    pub refspecs: Vec<String>,
}

/// Tracking information for the current branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracking {
    /// Local branch name.
    pub branch: String,
    /// Remote name.
    pub remote: String,
    /// Branch name on the remote.
    pub remote_branch: String,
}

impl Tracking {
    /// Remote-tracking ref the branch rebases onto, e.g. `origin/master`.
    pub fn upstream(&self) -> String {
        // "." tracks a branch of the same repository.
        if self.remote == "." {
            return self.remote_branch.clone();
        }
        format!("{}/{}", self.remote, self.remote_branch)
    }

    /// Refspec pushing the current branch to its remote counterpart.
    pub fn push_refspec(&self) -> String {
        format!("refs/heads/{}:refs/heads/{}", self.branch, self.remote_branch)
    }
}

/// Result of a completed rebase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RebaseOutcome {
    /// Local commits replayed onto the upstream.
    pub completed_steps: usize,
    /// Upstream commits the branch moved forward by.
    pub upstream_commits: usize,
}

/// Result of a full sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Local and upstream were already identical.
    UpToDate,
    /// The branch moved to the upstream tip; nothing to push.
    FastForwarded { commits: usize },
    /// Local commits were replayed and pushed.
    Pushed { commits: usize },
}

/// Drives fetch, rebase and push against one repository.
pub struct SyncCoordinator<'r> {
    repo: &'r mut Repository,
    options: RemoteOptions,
    state: SyncState,
}

impl<'r> SyncCoordinator<'r> {
    pub fn new(repo: &'r mut Repository, options: RemoteOptions) -> Self {
        Self {
            repo,
            options,
            state: SyncState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Resolve the current branch's remote and remote branch.
    ///
    /// # Errors
    ///
    /// Returns `GitError::DetachedHead` or `GitError::NoUpstream`.
    pub fn tracking(&self) -> Result<Tracking> {
        let branch = self.repo.current_branch()?;

        let merge = self
            .repo
            .config_value(&format!("branch.{}.merge", branch))?
            .ok_or_else(|| GitError::NoUpstream(branch.clone()))?;
        let remote_branch = merge
            .strip_prefix("refs/heads/")
            .unwrap_or(&merge)
            .to_string();

        let remote = match &self.options.remote {
            Some(remote) => remote.clone(),
            None => self
                .repo
                .config_value(&format!("branch.{}.remote", branch))?
                .ok_or_else(|| GitError::NoUpstream(branch.clone()))?,
        };

        Ok(Tracking {
            branch,
            remote,
            remote_branch,
        })
    }

    /// Run the full sequence: fetch, rebase, and push if anything was replayed.
    ///
    /// The coordinator is back in [`SyncState::Idle`] when this returns,
    /// whether it succeeded or not.
    pub fn sync(&mut self) -> Result<SyncOutcome> {
        let result = self.run_sync();
        self.transition(SyncState::Idle);
        result
    }

    fn run_sync(&mut self) -> Result<SyncOutcome> {
        self.fetch()?;
        let rebase = self.rebase()?;

        if rebase.completed_steps > 0 {
            self.push()?;
            return Ok(SyncOutcome::Pushed {
                commits: rebase.completed_steps,
            });
        }
        if rebase.upstream_commits > 0 {
            return Ok(SyncOutcome::FastForwarded {
                commits: rebase.upstream_commits,
            });
        }
        Ok(SyncOutcome::UpToDate)
    }

    /// Fetch the tracked remote.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::FetchFailed` on network or authentication failure.
    pub fn fetch(&mut self) -> Result<()> {
        self.transition(SyncState::Fetching);
        let tracking = self.tracking()?;
        let env = self.repo.remote_env(&tracking.remote)?;
        let env: Vec<(&str, &str)> = env.iter().map(|(k, v)| (*k, v.as_str())).collect();

        let mut args = vec!["fetch", "--quiet", tracking.remote.as_str()];
        args.extend(self.options.refspecs.iter().map(String::as_str));

        debug!(remote = %tracking.remote, refspecs = self.options.refspecs.len(), "fetching");
        self.repo.run(&args, &env).map_err(|e| SyncError::FetchFailed {
            remote: tracking.remote.clone(),
            reason: failure_reason(e),
        })?;

        info!(remote = %tracking.remote, "fetched");
        Ok(())
    }

    /// Rebase the current branch onto its upstream.
    ///
    /// Any outcome other than a clean completion aborts the rebase, restoring
    /// the branch to its pre-rebase commit.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::DirtyWorkTree` without touching the branch when
    /// tracked files have uncommitted changes, and
    /// `SyncError::RebaseConflict` after aborting.
    pub fn rebase(&mut self) -> Result<RebaseOutcome> {
        self.transition(SyncState::Rebasing);
        let tracking = self.tracking()?;
        let upstream = tracking.upstream();

        let (ahead, behind) = self.repo.ahead_behind(&upstream)?;
        debug!(branch = %tracking.branch, %upstream, ahead, behind, "rebasing");
        if behind == 0 {
            // Upstream is already contained in HEAD; nothing to replay onto.
            return Ok(RebaseOutcome {
                completed_steps: ahead,
                upstream_commits: 0,
            });
        }

        // git refuses to rebase over tracked changes; untracked files only
        // matter if upstream adds the same path, which aborts below.
        let changes = self
            .repo
            .status()?
            .iter()
            .filter(|e| !e.is_untracked())
            .count();
        if changes > 0 {
            warn!(changes, "work tree has uncommitted changes, not rebasing");
            return Err(SyncError::DirtyWorkTree { changes }.into());
        }

        let signature = self.repo.signature()?;
        let before = self.repo.head()?;

        let output = self
            .repo
            .output(["rebase", "--quiet", upstream.as_str()], &signature.env())?;
        if !output.status.success() || self.repo.rebase_in_progress() {
            warn!(
                branch = %tracking.branch,
                %upstream,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "rebase did not complete, aborting"
            );
            self.abort_rebase(before.as_deref());
            self.transition(SyncState::Aborted);
            return Err(SyncError::RebaseConflict {
                local: tracking.branch,
                upstream,
            }
            .into());
        }

        info!(replayed = ahead, upstream_commits = behind, "rebase complete");
        Ok(RebaseOutcome {
            completed_steps: ahead,
            upstream_commits: behind,
        })
    }

    /// Push the current branch to its remote counterpart.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::PushFailed`, typically when the remote moved
    /// since the last fetch.
    pub fn push(&mut self) -> Result<()> {
        self.transition(SyncState::Pushing);
        let tracking = self.tracking()?;
        let env = self.repo.remote_env(&tracking.remote)?;
        let env: Vec<(&str, &str)> = env.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let refspec = tracking.push_refspec();

        debug!(remote = %tracking.remote, %refspec, "pushing");
        self.repo
            .run(
                ["push", "--quiet", tracking.remote.as_str(), refspec.as_str()],
                &env,
            )
            .map_err(|e| SyncError::PushFailed {
                remote: tracking.remote.clone(),
                reason: failure_reason(e),
            })?;

        info!(remote = %tracking.remote, "pushed");
        Ok(())
    }

    fn abort_rebase(&self, before: Option<&str>) {
        if self.repo.rebase_in_progress() {
            if let Err(e) = self.repo.run(["rebase", "--abort"], &[]) {
                warn!(error = %e, "rebase --abort failed");
            }
        }

        let after = self.repo.head().ok().flatten();
        if after.as_deref() != before {
            warn!(?before, ?after, "HEAD moved during aborted rebase");
        }
    }

    fn transition(&mut self, next: SyncState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "sync state");
            self.state = next;
        }
    }
}

fn failure_reason(error: crate::error::Error) -> String {
    match error {
        crate::error::Error::Git(GitError::Command { stderr, .. }) => stderr,
        other => other.to_string(),
    }
}
