//! # Command-Line Interface
//!
//! Every command plugs into a small lifecycle framework (see [`Command`]).
//!
//! ## Command Groups
//!
//! | Group | Policy | Commands |
//! |-------|--------|----------|
//! | Session | [`no_login`] | `login`, `info`, `version` |
//! | Brokers | [`require_login`] | `register-broker`, `list-brokers`, `update-broker`, `delete-broker` |
//! | Platforms | [`require_login`] | `register-platform`, `list-platforms`, `update-platform`, `delete-platform` |
//!
//! ## Global Flags
//!
//! - `--verbose` / `-v` - extra progress messages on the output
//! - `--format` / `-f` - `text` (default) or `json`
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse process arguments and execute the matched command.

mod app;
mod broker;
mod command;
mod context;
mod error;
mod info;
mod input;
mod login;
mod output;
mod platform;
mod version;

#[cfg(test)]
pub(crate) mod testing;

/// Name the binary is invoked as
pub const BIN_NAME: &str = "smctl";

pub use app::{run, smctl, App};
pub use broker::{DeleteBrokerCommand, ListBrokersCommand, RegisterBrokerCommand, UpdateBrokerCommand};
pub use command::{no_login, positional_args, require_login, Command, Gate, Group, Lifecycle, Preparator};
pub use context::Context;
pub use error::{CliError, UsageError};
pub use info::InfoCommand;
pub use input::{BufferedInput, Input, TerminalInput};
pub use login::LoginCommand;
pub use output::{Output, OutputFormat};
pub use platform::{
    DeletePlatformCommand, ListPlatformsCommand, RegisterPlatformCommand, UpdatePlatformCommand,
};
pub use version::VersionCommand;
