//! Sync command: commit, fetch, rebase, push.

use tracing::info;

use crate::cli::{notify, output};
use crate::core::config::Config;
use crate::core::git::{ChangeTracker, RemoteOptions, SyncCoordinator, SyncOutcome};
use crate::core::notify::{Notifier, Severity};
use crate::error::Result;

/// Synchronize the store with its remote.
pub fn execute(config: &Config, no_commit: bool) -> Result<()> {
    if !config.git.enabled {
        output::warn("git is disabled in the config, nothing to sync");
        return Ok(());
    }

    let mut repo = super::open_repository(config)?;

    if config.git.auto_commit && !no_commit {
        let status = ChangeTracker::new(&mut repo).commit_all()?;
        if !status.is_empty() {
            output::success(&format!(
                "committed {}",
                output::plural(status.len(), "file")
            ));
        }
    }

    let options = RemoteOptions {
        remote: config.git.remote.clone(),
        refspecs: config.git.refspecs.clone(),
    };
    let outcome = match SyncCoordinator::new(&mut repo, options).sync() {
        Ok(outcome) => outcome,
        Err(e) => {
            notify::notifier(&config.notifications).notify(
                &format!("Password store sync failed: {}", e),
                Severity::Error,
                config.notifications.duration_ms,
            );
            return Err(e);
        }
    };

    info!(?outcome, "sync finished");
    match outcome {
        SyncOutcome::UpToDate => output::success("already up to date"),
        SyncOutcome::FastForwarded { commits } => output::success(&format!(
            "pulled {}",
            output::plural(commits, "commit")
        )),
        SyncOutcome::Pushed { commits } => output::success(&format!(
            "pushed {}",
            output::plural(commits, "commit")
        )),
    }
    Ok(())
}
