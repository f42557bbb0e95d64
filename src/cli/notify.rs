//! Notification sinks for the command line.
//!
//! Desktop notifications go through `notify-send` when it is installed.
//! Otherwise informational messages are printed; errors are left to the
//! command's exit path, which already prints them.

use std::process::{Command, Stdio};
use std::sync::Arc;

use tracing::debug;

use crate::cli::output;
use crate::core::config::NotificationConfig;
use crate::core::constants;
use crate::core::notify::{Notifier, Severity, Silent};

/// Desktop notifications via `notify-send`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Desktop;

impl Notifier for Desktop {
    fn notify(&self, message: &str, severity: Severity, duration_ms: u64) {
        let urgency = match severity {
            Severity::Info => "normal",
            Severity::Error => "critical",
        };
        let status = Command::new("notify-send")
            .args(["--app-name", constants::APP_NAME, "--urgency", urgency])
            .arg(format!("--expire-time={}", duration_ms))
            .arg(constants::APP_NAME)
            .arg(message)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        if let Err(e) = status {
            debug!(error = %e, "notify-send failed");
        }
    }
}

/// Terminal output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console;

impl Notifier for Console {
    fn notify(&self, message: &str, severity: Severity, _duration_ms: u64) {
        if severity == Severity::Info {
            for line in message.lines() {
                output::hint(line);
            }
        }
    }
}

/// Pick the notifier for this configuration.
pub fn notifier(config: &NotificationConfig) -> Arc<dyn Notifier> {
    if !config.enabled {
        return Arc::new(Silent);
    }
    let graphical =
        std::env::var_os("DISPLAY").is_some() || std::env::var_os("WAYLAND_DISPLAY").is_some();
    if graphical && which::which("notify-send").is_ok() {
        return Arc::new(Desktop);
    }
    Arc::new(Console)
}
