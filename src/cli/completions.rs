//! Completions command.

use std::io;

use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};

use crate::cli::{Cli, Shell};
use crate::core::constants;
use crate::error::Result;

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => CompletionShell::Bash,
            Shell::Zsh => CompletionShell::Zsh,
            Shell::Fish => CompletionShell::Fish,
            Shell::PowerShell => CompletionShell::PowerShell,
        }
    }
}

/// Write a completion script for `shell` to stdout.
pub fn execute(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    generate(
        CompletionShell::from(shell),
        &mut cmd,
        constants::APP_NAME,
        &mut io::stdout().lock(),
    );
    Ok(())
}
