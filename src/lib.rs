//! passmenu - Pick a secret from a git-synced password store, copy it, let it expire.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── list          # Enumerate store entries
//! │   ├── show          # Reveal an entry on the clipboard
//! │   ├── commit        # Commit store changes
//! │   ├── sync          # Fetch, rebase, push
//! │   ├── status        # Store and repository overview
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # config.toml loading
//!     ├── store         # Store enumeration and display names
//!     ├── decrypt/      # Decryption backends
//!     │   ├── mod       # Decryptor trait
//!     │   └── gpg       # gpg CLI implementation
//!     ├── clipboard/    # Delivery channel
//!     ├── notify        # Notification sink
//!     ├── handoff       # Decrypt, deliver, expire
//!     └── git/          # Repository handle, change tracking, sync
//! ```
//!
//! # Features
//!
//! - Display names derived from the store layout
//! - Clipboard cleared after a timeout unless the user copied something else
//! - One commit per changed store file
//! - Rebase-only sync that aborts cleanly on conflicts

pub mod cli;
pub mod core;
pub mod error;
