//! passmenu - Pick a secret from a git-synced password store.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use passmenu::cli::output;
use passmenu::cli::{execute, Cli};
use passmenu::core::constants;
use passmenu::error::{ConfigError, Error, GitError, StoreError, SyncError};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(constants::LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("passmenu=debug")
        } else {
            EnvFilter::new("passmenu=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli.command, cli.config.as_deref()) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}

fn suggestion(error: &Error) -> Option<&'static str> {
    match error {
        Error::Store(StoreError::Unavailable { .. }) => {
            Some("set PASSWORD_STORE_DIR or [store] path in the config")
        }
        Error::Store(StoreError::NotFound(_)) => Some("run: passmenu list"),
        Error::Git(GitError::NotARepository(_)) => Some("run: git init in the store directory"),
        Error::Git(GitError::Locked(_)) => {
            Some("another passmenu is using this store; retry when it finishes")
        }
        Error::Git(GitError::NoIdentity) => {
            Some("run: git config user.name NAME && git config user.email EMAIL")
        }
        Error::Git(GitError::NoUpstream(_)) => {
            Some("run: git branch --set-upstream-to REMOTE/BRANCH")
        }
        Error::Sync(SyncError::DirtyWorkTree { .. }) => Some("run: passmenu commit"),
        Error::Sync(SyncError::RebaseConflict { .. }) => {
            Some("resolve the divergence by hand; the branch was left untouched")
        }
        Error::Config(ConfigError::ReadFile { .. }) => Some("check --config or PASSMENU_CONFIG"),
        _ => None,
    }
}
