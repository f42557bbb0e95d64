//! Show command.
//!
//! Copies an entry to the clipboard and stays alive until the clipboard
//! expires. Ctrl-C expires it early.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cli::{notify, output, select};
use crate::core::clipboard::SystemClipboard;
use crate::core::config::Config;
use crate::core::decrypt::Gpg;
use crate::core::handoff::{HandoffOptions, Reveal, SecretHandoff};
use crate::error::{Result, StoreError};

/// Reveal an entry on the clipboard.
pub fn execute(
    config: &Config,
    name: Option<String>,
    ttl: Option<u64>,
    all_lines: bool,
) -> Result<()> {
    // Enumerate first: a missing store never opens the prompt.
    let index = super::store_index(config)?;
    let entries = index.entries()?;
    if entries.is_empty() {
        output::warn("no entries in password store");
        return Ok(());
    }

    let selection = match name {
        Some(name) if entries.contains_key(&name) => name,
        Some(name) => return Err(StoreError::NotFound(name).into()),
        None => {
            let names: Vec<String> = entries.keys().cloned().collect();
            match select::prompt(&names)? {
                Some(name) => name,
                None => {
                    output::dimmed("cancelled");
                    return Ok(());
                }
            }
        }
    };

    let ttl = ttl
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.clipboard_ttl());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let handoff = SecretHandoff::new(
        Arc::new(Gpg::from_config(&config.gpg)),
        Arc::new(SystemClipboard::detect()?),
        notify::notifier(&config.notifications),
        HandoffOptions {
            first_line_only: config.store.first_line_only && !all_lines,
            notification_ms: config.notifications.duration_ms,
        },
        runtime.handle().clone(),
    );

    match handoff.reveal(&selection, &entries, ttl)? {
        Reveal::Cancelled => {
            output::dimmed("cancelled");
            return Ok(());
        }
        Reveal::Revealed { name, expires_at } => {
            info!(%name, "revealed");
            output::success(&format!(
                "copied {} (clears at {})",
                output::key(&name),
                expires_at.format("%H:%M:%S")
            ));
        }
    }

    runtime.block_on(async {
        tokio::select! {
            _ = handoff.wait() => {}
            _ = tokio::signal::ctrl_c() => {
                debug!("interrupted, expiring now");
                handoff.expire_now();
            }
        }
    });

    output::dimmed("clipboard expired");
    Ok(())
}
