//! Decrypt-then-expire handoff.
//!
//! A reveal decrypts one entry, puts it on the clipboard and schedules a
//! single-shot expiry. When the expiry fires it clears the clipboard only if
//! the clipboard still holds what this reveal wrote, so a value the user
//! copied in the meantime survives.
//!
//! Only one expiry is pending per handoff: a new reveal supersedes the
//! previous one. Expiries from other handoffs (other processes) sharing the
//! same clipboard are independent and protected by the same equality check.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::core::clipboard::{clear_if_unchanged, Clipboard};
use crate::core::decrypt::Decryptor;
use crate::core::notify::{Notifier, Severity};
use crate::error::Result;

/// Outcome of [`SecretHandoff::reveal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reveal {
    /// The selection did not name an entry; nothing happened.
    Cancelled,
    /// The secret is on the clipboard until `expires_at`.
    Revealed {
        name: String,
        expires_at: DateTime<Local>,
    },
}

/// Secret waiting to be cleared from the clipboard.
///
/// The plaintext is zeroized when the expiry is dropped.
pub struct PendingExpiry {
    secret: Zeroizing<String>,
    expires_at: Instant,
}

impl PendingExpiry {
    fn new(secret: String, ttl: Duration) -> Self {
        Self {
            secret: Zeroizing::new(secret),
            expires_at: Instant::now() + ttl,
        }
    }

    /// When the clipboard is due to be cleared.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    fn clear(&self, clipboard: &dyn Clipboard) {
        match clear_if_unchanged(clipboard, &self.secret) {
            Ok(true) => info!("clipboard expired"),
            Ok(false) => {}
            Err(e) => warn!(error = %e, "failed to clear clipboard"),
        }
    }
}

struct Scheduled {
    pending: Arc<PendingExpiry>,
    task: JoinHandle<()>,
    fired: watch::Receiver<bool>,
}

/// Handoff behavior settings.
#[derive(Debug, Clone, Copy)]
pub struct HandoffOptions {
    /// Deliver only the first line of the plaintext.
    pub first_line_only: bool,
    /// Notification display time.
    pub notification_ms: u64,
}

impl Default for HandoffOptions {
    fn default() -> Self {
        Self {
            first_line_only: true,
            notification_ms: crate::core::constants::DEFAULT_NOTIFICATION_MS,
        }
    }
}

/// Orchestrates decrypt → clipboard → timed clear.
pub struct SecretHandoff {
    decryptor: Arc<dyn Decryptor>,
    clipboard: Arc<dyn Clipboard>,
    notifier: Arc<dyn Notifier>,
    options: HandoffOptions,
    runtime: Handle,
    scheduled: Mutex<Option<Scheduled>>,
}

impl SecretHandoff {
    /// Create a handoff. Expiry timers are spawned on `runtime`.
    pub fn new(
        decryptor: Arc<dyn Decryptor>,
        clipboard: Arc<dyn Clipboard>,
        notifier: Arc<dyn Notifier>,
        options: HandoffOptions,
        runtime: Handle,
    ) -> Self {
        Self {
            decryptor,
            clipboard,
            notifier,
            options,
            runtime,
            scheduled: Mutex::new(None),
        }
    }

    /// Reveal `selection` for `ttl`.
    ///
    /// A selection missing from `entries` is treated as a cancelled prompt
    /// and returns [`Reveal::Cancelled`] without side effects. Decryption
    /// blocks the calling thread; run this off any UI thread.
    ///
    /// # Errors
    ///
    /// Returns `DecryptError` if the decryptor fails (not retried) and
    /// `ClipboardError` if the clipboard cannot be written. Both are also
    /// reported through the notifier.
    pub fn reveal(
        &self,
        selection: &str,
        entries: &BTreeMap<String, PathBuf>,
        ttl: Duration,
    ) -> Result<Reveal> {
        let Some(path) = entries.get(selection) else {
            debug!("selection cancelled or unknown, nothing revealed");
            return Ok(Reveal::Cancelled);
        };

        debug!(name = selection, backend = self.decryptor.name(), "revealing entry");
        let plaintext = match self.decryptor.decrypt(path) {
            Ok(plaintext) => Zeroizing::new(plaintext),
            Err(e) => {
                self.notify_error(&format!("Password decryption failed: {}", e));
                return Err(e.into());
            }
        };

        let secret = if self.options.first_line_only {
            first_line(&plaintext).to_string()
        } else {
            plaintext.to_string()
        };

        if let Err(e) = self.clipboard.set(&secret) {
            self.notify_error(&format!("Could not copy to the clipboard: {}", e));
            return Err(e.into());
        }

        self.schedule(PendingExpiry::new(secret, ttl));

        let expires_at = Local::now() + chrono::Duration::seconds(ttl.as_secs() as i64);
        self.notifier.notify(
            &format!(
                "The password has been copied to your clipboard.\nIt will be cleared in {} seconds ({}).",
                ttl.as_secs(),
                expires_at.format("%H:%M:%S")
            ),
            Severity::Info,
            self.options.notification_ms,
        );

        Ok(Reveal::Revealed {
            name: selection.to_string(),
            expires_at,
        })
    }

    /// Whether an expiry is still waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .map(|s| !s.task.is_finished())
            .unwrap_or(false)
    }

    /// Wait until the pending expiry (if any) has fired.
    ///
    /// Follows superseding reveals; returns early if the expiry is fired
    /// through [`expire_now`](Self::expire_now).
    pub async fn wait(&self) {
        loop {
            let mut fired = match self.lock().as_ref() {
                Some(scheduled) => scheduled.fired.clone(),
                None => return,
            };
            // An error means the timer was aborted before firing.
            if fired.wait_for(|done| *done).await.is_ok() {
                return;
            }
        }
    }

    /// Fire the pending expiry immediately.
    pub fn expire_now(&self) {
        if let Some(scheduled) = self.lock().take() {
            scheduled.task.abort();
            scheduled.pending.clear(self.clipboard.as_ref());
        }
    }

    fn schedule(&self, pending: PendingExpiry) {
        let pending = Arc::new(pending);
        let clipboard = Arc::clone(&self.clipboard);
        let timer = Arc::clone(&pending);
        let (done, fired) = watch::channel(false);

        let task = self.runtime.spawn(async move {
            tokio::time::sleep_until(timer.expires_at).await;
            timer.clear(clipboard.as_ref());
            let _ = done.send(true);
        });

        let previous = self.lock().replace(Scheduled {
            pending,
            task,
            fired,
        });
        if let Some(previous) = previous {
            debug!("superseding previous expiry");
            previous.task.abort();
        }
    }

    fn notify_error(&self, message: &str) {
        self.notifier
            .notify(message, Severity::Error, self.options.notification_ms);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Scheduled>> {
        self.scheduled.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Text up to the first line break (`\n` or `\r\n`).
pub fn first_line(text: &str) -> &str {
    match text.find('\n') {
        Some(end) => text[..end].strip_suffix('\r').unwrap_or(&text[..end]),
        None => text,
    }
}
