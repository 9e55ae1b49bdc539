//! Command failures
//!
//! Argument errors come out of `bind`/`validate` and are shown with usage
//! help. Everything else is returned as is.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0} flag must be provided")]
    MissingFlag(&'static str),

    #[error("{0}")]
    InvalidArgs(String),

    #[error("You are not logged in. Use \"smctl login\" to log in.")]
    NotLoggedIn,

    #[error("service manager URL is invalid")]
    InvalidUrl,

    #[error("username/password should not be empty")]
    EmptyCredentials,

    #[error("{kind} \"{name}\" not found")]
    NotFound { kind: &'static str, name: String },

    #[error("unknown command \"{0}\" for \"smctl\"")]
    UnknownCommand(String),
}

/// An argument error rendered together with the command usage
#[derive(Debug, Error)]
#[error("{error}\n\n{usage}")]
pub struct UsageError {
    pub error: anyhow::Error,
    pub usage: String,
}
