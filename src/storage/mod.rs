//! # Storage Layer
//!
//! Local persistence for smctl. The only persisted state is the login
//! session, kept in a small TOML file.
//!
//! ## Storage Format
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Session | TOML | `$SMCTL_CONFIG` or `~/.config/smctl/config.toml` |
//!
//! ## Concurrency Safety
//!
//! - Writes are atomic (temp file + rename) under an exclusive `fs2` lock
//! - The file is created with mode `0600` on Unix since it holds a token
//!
//! ## Key Types
//!
//! - [`Configuration`] - Load/save contract every command relies on
//! - [`FileConfiguration`] - The on-disk implementation

mod config;

pub use config::{ConfigError, Configuration, FileConfiguration, CONFIG_ENV};
