//! Test fixtures and constants.

/// A small store layout with nested directories.
pub const STANDARD_ENTRIES: &[&str] = &[
    "email/work",
    "email/personal",
    "web/github",
    "banking/MyBank",
];

/// Multi-line entry in the usual pass layout.
pub const MULTILINE_SECRET: &str = "s3cr3t\nuser: bob\nurl: https://example.com\n";

/// Config with desktop notifications off.
pub const QUIET_CONFIG: &str = r#"
[notifications]
enabled = false
"#;
