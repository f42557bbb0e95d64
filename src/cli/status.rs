//! Store and repository status.

use crate::cli::output;
use crate::core::config::Config;
use crate::core::git::{RemoteOptions, SyncCoordinator};
use crate::error::Result;

/// Show store and repository status.
pub fn execute(config: &Config) -> Result<()> {
    let index = super::store_index(config)?;
    let entries = index.entries()?;

    output::section("Password Store");
    output::kv("root", output::path(&index.root().display().to_string()));
    output::kv("entries", entries.len());

    if !config.git.enabled {
        output::kv("git", "disabled");
        return Ok(());
    }

    let mut repo = super::open_repository(config)?;
    let pending = repo.status()?.len();
    let branch = repo.current_branch().unwrap_or_else(|_| "(detached)".to_string());
    output::kv("branch", &branch);

    let options = RemoteOptions {
        remote: config.git.remote.clone(),
        refspecs: Vec::new(),
    };
    let tracking = SyncCoordinator::new(&mut repo, options).tracking();
    match tracking {
        Ok(tracking) => {
            let upstream = tracking.upstream();
            output::kv("upstream", &upstream);
            // Counts are against the last fetch.
            match repo.ahead_behind(&upstream) {
                Ok((ahead, behind)) => {
                    output::kv("ahead", ahead);
                    output::kv("behind", behind);
                }
                Err(_) => output::kv("upstream", format!("{} (not fetched)", upstream)),
            }
        }
        Err(_) => output::kv("upstream", "none"),
    }

    output::kv(
        "pending",
        if pending == 0 {
            "clean".to_string()
        } else {
            output::plural(pending, "change")
        },
    );

    if pending > 0 {
        println!();
        output::hint("run: passmenu commit");
    }
    Ok(())
}
