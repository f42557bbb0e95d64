//! Test support utilities for passmenu integration tests.
//!
//! Provides isolated store directories, git repository fixtures and
//! command helpers.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod git;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use git::*;
#[allow(unused_imports)]
pub use crate::skip_without_git;

use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own store dir and home dir. Child processes receive
/// both through environment variables, so tests can run in parallel.
pub struct Test {
    /// Temporary password store root
    pub store: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create an empty store.
    pub fn new() -> Self {
        let store = TempDir::new().expect("failed to create temp store");
        let home = TempDir::new().expect("failed to create temp home");

        Self { store, home }
    }

    /// Create a store holding `names` (display names with `/` separators).
    pub fn with_entries(names: &[&str]) -> Self {
        let t = Self::new();
        for name in names {
            t.write_entry(name, "s3cr3t\n");
        }
        t
    }

    /// Create a store that is also a git repository with one commit.
    pub fn with_repo(names: &[&str]) -> Self {
        let t = Self::with_entries(names);
        init_repo(t.root());
        git(t.root(), &["add", "--all"]);
        git(t.root(), &["commit", "-q", "-m", "initial"]);
        t
    }

    /// Store root.
    pub fn root(&self) -> &Path {
        self.store.path()
    }

    /// Write an entry file for `name`; content is not really encrypted.
    pub fn write_entry(&self, name: &str, content: &str) -> PathBuf {
        let path = self.root().join(format!("{}.gpg", name));
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create entry dir");
        }
        std::fs::write(&path, content).expect("failed to write entry");
        path
    }

    /// Config file passed to commands once written.
    pub fn config_path(&self) -> PathBuf {
        self.home.path().join("config.toml")
    }

    /// Write the config file used by [`Test::cmd`].
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.config_path();
        std::fs::write(&path, contents).expect("failed to write config");
        path
    }
}
