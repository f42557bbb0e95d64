//! Core library components.
//!
//! The retrieval and synchronization engine: store enumeration, the
//! decrypt-then-expire handoff, and git change tracking and sync. Everything
//! user-facing lives in `cli`.

pub mod clipboard;
pub mod config;
pub mod constants;
pub mod decrypt;
pub mod git;
pub mod handoff;
pub mod notify;
pub mod store;
