//! System clipboard through the platform's command-line tools.
//!
//! Detection order: Wayland (`wl-copy`/`wl-paste`), `xclip`, `xsel`,
//! macOS (`pbcopy`/`pbpaste`).

use std::io::Write;
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use super::Clipboard;
use crate::error::ClipboardError;

/// Clipboard tool family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Wayland,
    Xclip,
    Xsel,
    Pasteboard,
}

impl Tool {
    /// Detect the first usable tool on this machine.
    pub fn detect() -> Option<Self> {
        let wayland = std::env::var_os("WAYLAND_DISPLAY").is_some();
        let candidates = [Self::Wayland, Self::Xclip, Self::Xsel, Self::Pasteboard];

        candidates.into_iter().find(|tool| {
            if *tool == Self::Wayland && !wayland {
                return false;
            }
            tool.programs()
                .iter()
                .all(|program| which::which(program).is_ok())
        })
    }

    fn programs(self) -> &'static [&'static str] {
        match self {
            Self::Wayland => &["wl-copy", "wl-paste"],
            Self::Xclip => &["xclip"],
            Self::Xsel => &["xsel"],
            Self::Pasteboard => &["pbcopy", "pbpaste"],
        }
    }

    fn copy_command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Wayland => ("wl-copy", &[]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-in"]),
            Self::Xsel => ("xsel", &["--clipboard", "--input"]),
            Self::Pasteboard => ("pbcopy", &[]),
        }
    }

    fn paste_command(self) -> (&'static str, &'static [&'static str]) {
        match self {
            Self::Wayland => ("wl-paste", &["--no-newline"]),
            Self::Xclip => ("xclip", &["-selection", "clipboard", "-out"]),
            Self::Xsel => ("xsel", &["--clipboard", "--output"]),
            Self::Pasteboard => ("pbpaste", &[]),
        }
    }

    /// Dedicated clear command, if the tool has one. Others copy "".
    fn clear_command(self) -> Option<(&'static str, &'static [&'static str])> {
        match self {
            Self::Wayland => Some(("wl-copy", &["--clear"])),
            Self::Xsel => Some(("xsel", &["--clipboard", "--clear"])),
            Self::Xclip | Self::Pasteboard => None,
        }
    }
}

/// Clipboard backed by a platform tool.
#[derive(Debug, Clone, Copy)]
pub struct SystemClipboard {
    tool: Tool,
}

impl SystemClipboard {
    /// Use the first tool found on this machine.
    ///
    /// # Errors
    ///
    /// Returns `ClipboardError::Unavailable` if no supported tool is installed.
    pub fn detect() -> Result<Self, ClipboardError> {
        let tool = Tool::detect().ok_or(ClipboardError::Unavailable)?;
        debug!(?tool, "using system clipboard");
        Ok(Self { tool })
    }

    pub fn with_tool(tool: Tool) -> Self {
        Self { tool }
    }

    fn write(program: &str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
        let failed = |reason: String| ClipboardError::Command {
            program: program.to_string(),
            reason,
        };

        // The copy tools fork a daemon that holds the selection; its
        // inherited stdout must not be piped or we would wait on it.
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| failed(e.to_string()))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(text.as_bytes())
                .map_err(|e| failed(e.to_string()))?;
        }

        let status = child.wait().map_err(|e| failed(e.to_string()))?;
        if !status.success() {
            return Err(failed(format!("exited with {}", status)));
        }
        Ok(())
    }
}

impl Clipboard for SystemClipboard {
    fn set(&self, text: &str) -> Result<(), ClipboardError> {
        let (program, args) = self.tool.copy_command();
        trace!(program, len = text.len(), "writing clipboard");
        Self::write(program, args, text)
    }

    fn get(&self) -> Result<Option<String>, ClipboardError> {
        let (program, args) = self.tool.paste_command();
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| ClipboardError::Command {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        // wl-paste and xclip exit non-zero when the selection is empty.
        if !output.status.success() || output.stdout.is_empty() {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(&output.stdout).into_owned()))
    }

    fn clear(&self) -> Result<(), ClipboardError> {
        match self.tool.clear_command() {
            Some((program, args)) => Self::write(program, args, ""),
            None => self.set(""),
        }
    }
}
