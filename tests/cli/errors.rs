//! Error output and exit codes.

use crate::support::*;

#[test]
fn test_missing_store_fails_with_hint() {
    let t = Test::new();
    let output = t
        .cmd()
        .env("PASSWORD_STORE_DIR", t.root().join("missing"))
        .arg("list")
        .output()
        .unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "password store unavailable");
    assert_stdout_contains(&output, "PASSWORD_STORE_DIR");
}

#[test]
fn test_show_unknown_entry_fails() {
    let t = Test::with_entries(STANDARD_ENTRIES);
    let output = t.cmd().args(["show", "nope/none"]).output().unwrap();

    assert_failure(&output);
    assert_stderr_contains(&output, "nope/none");
}

#[test]
fn test_commit_outside_repository_fails() {
    skip_without_git!();
    let t = Test::with_entries(&["email/work"]);

    let output = t.commit();
    // The temp dir may sit inside an unrelated work tree on some machines.
    if !output.status.success() {
        assert_stderr_contains(&output, "not a git repository");
    }
}

#[test]
fn test_invalid_config_fails() {
    let t = Test::with_entries(&["email/work"]);
    t.write_config("[store]\nclipboard_timeout = 0\n");

    let output = t.list();
    assert_failure(&output);
}

#[test]
fn test_explicit_config_must_exist() {
    let t = Test::with_entries(&["email/work"]);
    let output = t
        .cmd()
        .arg("--config")
        .arg(t.home.path().join("nope.toml"))
        .arg("list")
        .output()
        .unwrap();

    assert_failure(&output);
}

#[test]
fn test_sync_without_upstream_fails() {
    skip_without_git!();
    let t = Test::with_repo(&["email/work"]);
    t.write_config(QUIET_CONFIG);

    let output = t.cmd().arg("sync").output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "no upstream");
}
