//! Fetch, rebase and push against a local bare remote.

mod support;
use support::*;

use passmenu::core::git::{
    ChangeTracker, RemoteOptions, Repository, SyncCoordinator, SyncOutcome, SyncState,
};
use passmenu::error::{Error, GitError, SyncError};

fn sync(dir: &std::path::Path) -> passmenu::error::Result<SyncOutcome> {
    let mut repo = Repository::open(dir).unwrap();
    let mut coordinator = SyncCoordinator::new(&mut repo, RemoteOptions::default());
    let result = coordinator.sync();
    assert_eq!(coordinator.state(), SyncState::Idle);
    result
}

#[test]
fn test_fresh_clone_is_up_to_date() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);

    assert_eq!(sync(&remote.bob).unwrap(), SyncOutcome::UpToDate);
}

#[test]
fn test_remote_commits_fast_forward() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);
    commit_file(&remote.alice, "web/github.gpg", "new\n");
    git(&remote.alice, &["push", "-q"]);

    let outcome = sync(&remote.bob).unwrap();

    assert_eq!(outcome, SyncOutcome::FastForwarded { commits: 1 });
    assert_eq!(head(&remote.bob), head(&remote.alice));
}

#[test]
fn test_local_commits_are_rebased_and_pushed() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);
    commit_file(&remote.alice, "web/github.gpg", "alice\n");
    git(&remote.alice, &["push", "-q"]);
    commit_file(&remote.bob, "banking/MyBank.gpg", "bob\n");

    let outcome = sync(&remote.bob).unwrap();

    assert_eq!(outcome, SyncOutcome::Pushed { commits: 1 });
    assert_eq!(remote.remote_head(), head(&remote.bob));
    // Linear history: alice's commit sits below bob's.
    assert_eq!(commit_count(&remote.bob), 3);
    assert_eq!(
        git(&remote.bob, &["rev-list", "--merges", "--count", "HEAD"]),
        "0"
    );
    assert_eq!(subject(&remote.bob, "HEAD~1"), "update web/github.gpg");
}

#[test]
fn test_tracked_changes_then_sync() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);
    std::fs::write(remote.bob.join("email").join("work.gpg"), "rotated\n").unwrap();

    let mut repo = Repository::open(&remote.bob).unwrap();
    ChangeTracker::new(&mut repo).commit_all().unwrap();
    let outcome = SyncCoordinator::new(&mut repo, RemoteOptions::default())
        .sync()
        .unwrap();
    drop(repo);

    assert_eq!(outcome, SyncOutcome::Pushed { commits: 1 });
    assert_eq!(
        git(&remote.bare, &["log", "-1", "--format=%s", "master"]),
        "Modify password store file email/work.gpg"
    );
}

#[test]
fn test_conflict_aborts_and_restores_branch() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);
    commit_file(&remote.alice, "email/work.gpg", "alice\n");
    git(&remote.alice, &["push", "-q"]);
    commit_file(&remote.bob, "email/work.gpg", "bob\n");
    let before = head(&remote.bob);
    let remote_before = remote.remote_head();

    let err = sync(&remote.bob).unwrap_err();

    assert!(
        matches!(err, Error::Sync(SyncError::RebaseConflict { .. })),
        "unexpected error: {}",
        err
    );
    assert_eq!(head(&remote.bob), before);
    assert_eq!(remote.remote_head(), remote_before);
    assert!(!remote.bob.join(".git").join("rebase-merge").exists());
    assert!(!remote.bob.join(".git").join("rebase-apply").exists());
    assert!(git(&remote.bob, &["status", "--porcelain"]).is_empty());
}

#[test]
fn test_uncommitted_changes_block_rebase() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);
    commit_file(&remote.alice, "web/github.gpg", "alice\n");
    git(&remote.alice, &["push", "-q"]);
    std::fs::write(remote.bob.join("email").join("work.gpg"), "unsaved\n").unwrap();
    let before = head(&remote.bob);

    let err = sync(&remote.bob).unwrap_err();

    assert!(
        matches!(err, Error::Sync(SyncError::DirtyWorkTree { changes: 1 })),
        "unexpected error: {}",
        err
    );
    assert_eq!(head(&remote.bob), before);
    assert_eq!(
        std::fs::read_to_string(remote.bob.join("email").join("work.gpg")).unwrap(),
        "unsaved\n"
    );
}

#[test]
fn test_untracked_files_do_not_block_rebase() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);
    commit_file(&remote.alice, "web/github.gpg", "alice\n");
    git(&remote.alice, &["push", "-q"]);
    std::fs::write(remote.bob.join("notes.gpg"), "draft\n").unwrap();

    assert_eq!(
        sync(&remote.bob).unwrap(),
        SyncOutcome::FastForwarded { commits: 1 }
    );
}

#[test]
fn test_rebase_failure_leaves_coordinator_aborted() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);
    commit_file(&remote.alice, "email/work.gpg", "alice\n");
    git(&remote.alice, &["push", "-q"]);
    commit_file(&remote.bob, "email/work.gpg", "bob\n");

    let mut repo = Repository::open(&remote.bob).unwrap();
    let mut coordinator = SyncCoordinator::new(&mut repo, RemoteOptions::default());
    coordinator.fetch().unwrap();
    assert!(coordinator.rebase().is_err());
    assert_eq!(coordinator.state(), SyncState::Aborted);
}

#[test]
fn test_unreachable_remote_is_fetch_failure() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);
    let missing = remote.bare.with_file_name("gone.git");
    git(
        &remote.bob,
        &["remote", "set-url", "origin", &missing.to_string_lossy()],
    );

    let err = sync(&remote.bob).unwrap_err();
    assert!(matches!(err, Error::Sync(SyncError::FetchFailed { .. })));
}

#[test]
fn test_branch_without_upstream() {
    skip_without_git!();
    let t = Test::with_repo(&["email/work"]);

    let err = sync(t.root()).unwrap_err();
    assert!(matches!(err, Error::Git(GitError::NoUpstream(_))));
}

#[test]
fn test_remote_override_and_refspecs() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);
    let url = remote.bare.to_string_lossy().into_owned();
    git(&remote.bob, &["remote", "add", "mirror", &url]);
    git(&remote.bob, &["fetch", "-q", "mirror"]);
    commit_file(&remote.bob, "web/github.gpg", "bob\n");

    let mut repo = Repository::open(&remote.bob).unwrap();
    let options = RemoteOptions {
        remote: Some("mirror".to_string()),
        refspecs: vec!["+refs/heads/*:refs/remotes/mirror/*".to_string()],
    };
    let mut coordinator = SyncCoordinator::new(&mut repo, options);
    assert_eq!(coordinator.tracking().unwrap().upstream(), "mirror/master");

    let outcome = coordinator.sync().unwrap();
    drop(repo);
    assert_eq!(outcome, SyncOutcome::Pushed { commits: 1 });
    assert_eq!(remote.remote_head(), head(&remote.bob));
}
