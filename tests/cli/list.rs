//! Tests for `passmenu list`.

use crate::support::*;

#[test]
fn test_list_prints_sorted_names() {
    let t = Test::with_entries(STANDARD_ENTRIES);

    let output = t.list();
    assert_success(&output);

    let out = stdout(&output);
    let names: Vec<&str> = out.lines().collect();
    assert_eq!(
        names,
        vec!["banking/MyBank", "email/personal", "email/work", "web/github"]
    );
}

#[test]
fn test_list_json() {
    let t = Test::with_entries(STANDARD_ENTRIES);

    let output = t.list_json();
    assert_success(&output);

    let names: Vec<String> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(names.len(), 4);
    assert_eq!(names[0], "banking/MyBank");
}

#[test]
fn test_list_empty_store() {
    let t = Test::new();

    let output = t.list_json();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "[]");
}

#[test]
fn test_list_uses_configured_separator() {
    let t = Test::with_entries(&["web/github/alice"]);
    t.write_config("[store]\nseparator = \" > \"\n");

    let output = t.list();
    assert_success(&output);
    assert_stdout_contains(&output, "web > github > alice");
}

#[test]
fn test_list_skips_git_metadata() {
    skip_without_git!();
    let t = Test::with_repo(&["email/work"]);

    let output = t.list();
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "email/work");
}
