//! Tests for `passmenu status`.

use crate::support::*;

#[test]
fn test_status_counts_entries_and_changes() {
    skip_without_git!();
    let t = Test::with_repo(STANDARD_ENTRIES);
    t.write_entry("email/work", "rotated\n");

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "entries");
    assert_stdout_contains(&output, "4");
    assert_stdout_contains(&output, "master");
    assert_stdout_contains(&output, "1 change");
}

#[test]
fn test_status_with_upstream() {
    skip_without_git!();
    let remote = Remote::new(&[("email/work.gpg", "one\n")]);
    let t = Test::new();

    let output = t
        .cmd()
        .env("PASSWORD_STORE_DIR", &remote.bob)
        .arg("status")
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "origin/master");
    assert_stdout_contains(&output, "clean");
}

#[test]
fn test_status_git_disabled() {
    let t = Test::with_entries(&["email/work"]);
    t.write_config("[git]\nenabled = false\n");

    let output = t.status();
    assert_success(&output);
    assert_stdout_contains(&output, "disabled");
}
