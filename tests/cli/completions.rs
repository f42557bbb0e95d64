//! Tests for `passmenu completions`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_bash_completions() {
    let t = Test::new();
    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_passmenu"))
        .stdout(predicate::str::contains("sync"));
}

#[test]
fn test_completions_ignore_broken_config() {
    let t = Test::new();
    t.write_config("not = [valid");

    t.cmd().args(["completions", "zsh"]).assert().success();
}

#[test]
fn test_unknown_shell_is_rejected() {
    let t = Test::new();
    t.cmd()
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
