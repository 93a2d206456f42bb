//! Core library for the `snapview` CLI.
//!
//! The timeline decides which DOM a browser test runner shows while the user
//! previews the snapshots of a command: it cycles through multi-snapshot
//! commands, honours pinning, and restores the live page afterwards. When the
//! page under test lives on another origin, the state to restore is fetched
//! from an isolated context over the bridge. The `snapview` binary replays a
//! recorded event script through all of it and prints what would be shown.
mod app;
pub mod args;
pub mod bridge;
pub mod config;
pub mod display;
pub mod dom;
pub mod entry;
pub mod error;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod snapshot;
mod system;
pub mod timeline;
