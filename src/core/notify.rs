//! Notification sink.

use std::sync::{Arc, Mutex};

/// Notification severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Somewhere to tell the user what happened.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, severity: Severity, duration_ms: u64);
}

/// Notifier that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Notifier for Silent {
    fn notify(&self, _message: &str, _severity: Severity, _duration_ms: u64) {}
}

/// A notification captured by [`Recorder`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub duration_ms: u64,
}

/// Notifier that keeps every notification, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notifications received so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Notifier for Recorder {
    fn notify(&self, message: &str, severity: Severity, duration_ms: u64) {
        self.seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notification {
                message: message.to_string(),
                severity,
                duration_ms,
            });
    }
}
