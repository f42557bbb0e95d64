//! Tests for `passmenu commit`.

use crate::support::*;

#[test]
fn test_commit_nothing_to_do() {
    skip_without_git!();
    let t = Test::with_repo(&["email/work"]);

    let output = t.commit();
    assert_success(&output);
    assert_stdout_contains(&output, "nothing to commit");
    assert_eq!(commit_count(t.root()), 1);
}

#[test]
fn test_commit_each_file() {
    skip_without_git!();
    let t = Test::with_repo(&["email/work", "web/github"]);
    t.write_entry("email/work", "one\n");
    t.write_entry("web/github", "two\n");

    let output = t.commit();
    assert_success(&output);
    assert_stdout_contains(&output, "committed 2 files");
    assert_eq!(commit_count(t.root()), 3);
}

#[test]
fn test_commit_path_with_wrong_expectation_is_skipped() {
    skip_without_git!();
    let t = Test::with_repo(&["email/work"]);
    let path = t.write_entry("email/work", "one\n");

    let output = t
        .cmd()
        .args(["commit", "--expect", "new"])
        .arg(&path)
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "skipped");
    assert_eq!(commit_count(t.root()), 1);
}

#[test]
fn test_commit_path_with_expected_change() {
    skip_without_git!();
    let t = Test::with_repo(&["email/work"]);
    let path = t.write_entry("email/personal", "new\n");

    let output = t
        .cmd()
        .args(["commit", "--expect", "new"])
        .arg(&path)
        .output()
        .unwrap();
    assert_success(&output);
    assert_eq!(
        subject(t.root(), "HEAD"),
        "Add password store file email/personal.gpg"
    );
}

#[test]
fn test_commit_with_git_disabled() {
    let t = Test::with_entries(&["email/work"]);
    t.write_config("[git]\nenabled = false\n");

    let output = t.commit();
    assert_success(&output);
    assert_stdout_contains(&output, "git is disabled");
}
