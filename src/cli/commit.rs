//! Commit command.

use std::path::Path;

use tracing::info;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::git::{ChangeKind, ChangeTracker};
use crate::error::Result;

/// Commit store changes, one commit per file.
pub fn execute(config: &Config, path: Option<&Path>, expect: ChangeKind) -> Result<()> {
    if !config.git.enabled {
        output::warn("git is disabled in the config, nothing to commit");
        return Ok(());
    }

    let mut repo = super::open_repository(config)?;
    let mut tracker = ChangeTracker::new(&mut repo);

    match path {
        Some(path) => {
            if tracker.commit_single(path, expect)? {
                let shown = path.display().to_string();
                output::success(&format!("committed {}", output::path(&shown)));
            } else {
                output::dimmed(&format!("{} is not {}, skipped", path.display(), expect));
            }
        }
        None => {
            let status = tracker.commit_all()?;
            if status.is_empty() {
                output::dimmed("nothing to commit");
                return Ok(());
            }

            info!(files = status.len(), "commit complete");
            for entry in status.iter() {
                if let Some(kind) = entry.workdir {
                    output::list_item(&format!("{} {}", kind.verb(), entry.path));
                }
            }
            output::success(&format!("committed {}", output::plural(status.len(), "file")));
        }
    }
    Ok(())
}
