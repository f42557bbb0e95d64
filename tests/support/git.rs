//! Git repository fixtures.

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

/// Run git in `dir` and return stdout; panics on failure.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(args)
        .env_remove("GIT_DIR")
        .env_remove("GIT_WORK_TREE")
        .env_remove("GIT_INDEX_FILE")
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Configure identity and signing for a test repository.
pub fn configure(dir: &Path, name: &str) {
    git(dir, &["config", "user.name", name]);
    git(dir, &["config", "user.email", &format!("{}@example.com", name.to_lowercase())]);
    git(dir, &["config", "commit.gpgsign", "false"]);
    git(dir, &["config", "core.autocrlf", "false"]);
}

/// `git init` on `master` with a test identity.
pub fn init_repo(dir: &Path) {
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/master"]);
    configure(dir, "Alice");
}

/// Current commit of `dir`.
pub fn head(dir: &Path) -> String {
    git(dir, &["rev-parse", "HEAD"])
}

/// Number of commits reachable from HEAD.
pub fn commit_count(dir: &Path) -> usize {
    git(dir, &["rev-list", "--count", "HEAD"])
        .parse()
        .expect("rev-list count")
}

/// Subject of commit `rev`.
pub fn subject(dir: &Path, rev: &str) -> String {
    git(dir, &["log", "-1", "--format=%s", rev])
}

/// Write `content` to `name` under `dir` and commit it.
pub fn commit_file(dir: &Path, name: &str, content: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create dir");
    }
    std::fs::write(&path, content).expect("failed to write file");
    git(dir, &["add", "--all", "--", name]);
    git(dir, &["commit", "-q", "-m", &format!("update {}", name)]);
}

/// A bare remote with two clones tracking its `master`.
pub struct Remote {
    _root: TempDir,
    pub bare: PathBuf,
    pub alice: PathBuf,
    pub bob: PathBuf,
}

impl Remote {
    /// Set up the remote with `initial` committed by alice and cloned by bob.
    pub fn new(initial: &[(&str, &str)]) -> Self {
        let root = TempDir::new().expect("failed to create temp dir");
        let bare = root.path().join("store.git");
        let alice = root.path().join("alice");
        let bob = root.path().join("bob");

        std::fs::create_dir_all(&bare).expect("mkdir bare");
        git(&bare, &["init", "-q", "--bare"]);
        git(&bare, &["symbolic-ref", "HEAD", "refs/heads/master"]);

        std::fs::create_dir_all(&alice).expect("mkdir alice");
        init_repo(&alice);
        for (name, content) in initial {
            commit_file(&alice, name, content);
        }
        let url = bare.to_string_lossy().into_owned();
        git(&alice, &["remote", "add", "origin", &url]);
        git(&alice, &["push", "-q", "-u", "origin", "master"]);

        git(root.path(), &["clone", "-q", &url, "bob"]);
        configure(&bob, "Bob");

        Self {
            _root: root,
            bare,
            alice,
            bob,
        }
    }

    /// Tip of `master` on the remote.
    pub fn remote_head(&self) -> String {
        git(&self.bare, &["rev-parse", "refs/heads/master"])
    }
}
