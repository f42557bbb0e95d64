//! Command-line interface.

pub mod commit;
pub mod completions;
pub mod list;
pub mod notify;
pub mod output;
pub mod select;
pub mod show;
pub mod status;
pub mod sync;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::core::config::{self, Config};
use crate::core::constants;
use crate::core::git::{ChangeKind, IdentityFile, Repository};
use crate::core::store::StoreIndex;
use crate::error::Result;

/// passmenu - Pick a secret from a git-synced password store.
#[derive(Parser)]
#[command(
    name = "passmenu",
    about = "Pick a secret from a git-synced password store, copy it, let it expire",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to <config dir>/passmenu/config.toml)
    #[arg(long, global = true, env = constants::CONFIG_ENV)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// List all entries in the password store
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy an entry to the clipboard and clear it after a timeout
    Show {
        /// Entry name (prompts when omitted)
        name: Option<String>,
        /// Seconds before the clipboard is cleared
        #[arg(long)]
        ttl: Option<u64>,
        /// Copy every line instead of just the first
        #[arg(long)]
        all_lines: bool,
    },

    /// Commit changes to store files, one commit per file
    Commit {
        /// Only commit this file
        path: Option<PathBuf>,
        /// Change expected for PATH; anything else is skipped
        #[arg(long, value_enum, default_value_t = Expect::Modified, requires = "path")]
        expect: Expect,
    },

    /// Fetch, rebase onto the upstream branch, and push
    Sync {
        /// Do not commit pending changes first
        #[arg(long)]
        no_commit: bool,
    },

    /// Show store and repository status
    Status,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Change expected by `commit PATH`.
#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expect {
    New,
    Modified,
    Deleted,
}

impl From<Expect> for ChangeKind {
    fn from(expect: Expect) -> Self {
        match expect {
            Expect::New => ChangeKind::New,
            Expect::Modified => ChangeKind::Modified,
            Expect::Deleted => ChangeKind::Deleted,
        }
    }
}

/// Execute a command.
pub fn execute(command: Command, config_path: Option<&Path>) -> Result<()> {
    use Command::*;

    if let Completions { shell } = command {
        return completions::execute(shell);
    }

    let config = Config::load(config_path)?;
    match command {
        List { json } => list::execute(&config, json),
        Show {
            name,
            ttl,
            all_lines,
        } => show::execute(&config, name, ttl, all_lines),
        Commit { path, expect } => commit::execute(&config, path.as_deref(), expect.into()),
        Sync { no_commit } => sync::execute(&config, no_commit),
        Status => status::execute(&config),
        Completions { .. } => unreachable!("handled before loading config"),
    }
}

/// Store index for the configured root.
pub(crate) fn store_index(config: &Config) -> Result<StoreIndex> {
    let root = config.store_root()?;
    StoreIndex::new(root, &config.store.pattern, &config.store.separator)
}

/// Open the store's repository with credentials from the config.
pub(crate) fn open_repository(config: &Config) -> Result<Repository> {
    let root = config.store_root()?;
    let mut repo = Repository::open(&root)?;

    if let Some(key) = &config.git.ssh_key {
        let key = config::expand_home(key)?;
        debug!(key = %key.display(), "ssh identity configured");
        repo.set_credentials(Box::new(IdentityFile::new(key)));
    }
    Ok(repo)
}
