//! Delivery channel for revealed secrets.
//!
//! The channel is a single global slot shared with every other application
//! on the machine, so last writer wins and nothing can lock it. Expiry is
//! therefore a compare-then-clear, see [`clear_if_unchanged`].

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::error::ClipboardError;

mod system;

pub use system::{SystemClipboard, Tool};

/// Single-slot text channel (the system clipboard or a stand-in).
pub trait Clipboard: Send + Sync {
    /// Replace the channel content.
    fn set(&self, text: &str) -> Result<(), ClipboardError>;

    /// Current content, `None` when empty.
    fn get(&self) -> Result<Option<String>, ClipboardError>;

    /// Empty the channel.
    fn clear(&self) -> Result<(), ClipboardError>;

    /// Whether the channel currently holds text.
    fn contains(&self) -> bool {
        matches!(self.get(), Ok(Some(text)) if !text.is_empty())
    }
}

/// Clear the channel only if it still holds exactly `expected`.
///
/// Returns `true` if the channel was cleared. The read and the clear are two
/// separate operations on a channel other processes can write to, so a copy
/// landing between them is lost. There is no lock to take.
pub fn clear_if_unchanged(
    clipboard: &dyn Clipboard,
    expected: &str,
) -> Result<bool, ClipboardError> {
    match clipboard.get()? {
        Some(current) if current == expected => {
            clipboard.clear()?;
            debug!("clipboard cleared");
            Ok(true)
        }
        _ => {
            debug!("clipboard changed since reveal, leaving it alone");
            Ok(false)
        }
    }
}

/// In-process clipboard.
///
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        // A poisoned slot still holds a valid Option<String>.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Clipboard for MemoryClipboard {
    fn set(&self, text: &str) -> Result<(), ClipboardError> {
        *self.lock() = Some(text.to_string());
        Ok(())
    }

    fn get(&self) -> Result<Option<String>, ClipboardError> {
        Ok(self.lock().clone())
    }

    fn clear(&self) -> Result<(), ClipboardError> {
        *self.lock() = None;
        Ok(())
    }
}
