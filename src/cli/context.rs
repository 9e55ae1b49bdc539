//! Shared command context
//!
//! One [`Context`] is built per process and handed to every command's
//! constructor. It carries the output sink, the session store, the remote
//! connector and the global flags parsed before any command runs.

use std::cell::Cell;
use std::fmt::Display;
use std::io;

use anyhow::Result;

use super::error::CliError;
use super::output::{Output, OutputFormat};
use crate::client::{Connector, ServiceManager};
use crate::domain::SessionConfig;
use crate::storage::Configuration;

pub struct Context {
    output: Output,
    config: Box<dyn Configuration>,
    connector: Box<dyn Connector>,
    verbose: Cell<bool>,
}

impl Context {
    pub fn new(
        output: Output,
        config: Box<dyn Configuration>,
        connector: Box<dyn Connector>,
    ) -> Self {
        Self {
            output,
            config,
            connector,
            verbose: Cell::new(false),
        }
    }

    pub fn output(&self) -> &Output {
        &self.output
    }

    pub fn config(&self) -> &dyn Configuration {
        self.config.as_ref()
    }

    pub fn connector(&self) -> &dyn Connector {
        self.connector.as_ref()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose.get()
    }

    /// Applies the global flags; called by the dispatcher before a command runs
    pub fn apply_flags(&self, verbose: bool, format: OutputFormat) {
        self.verbose.set(verbose);
        self.output.set_format(format);
    }

    /// Prints a message only when `--verbose` is set
    pub fn verbose(&self, message: impl Display) -> io::Result<()> {
        if self.is_verbose() {
            self.output.line(message)?;
        }
        Ok(())
    }

    /// Loads the stored session, mapping any failure to "not logged in"
    pub fn session(&self) -> Result<SessionConfig> {
        self.config.load().map_err(|e| {
            tracing::debug!(error = %e, "no usable session");
            CliError::NotLoggedIn.into()
        })
    }

    /// Connects to the Service Manager of the stored session
    pub fn client(&self) -> Result<Box<dyn ServiceManager>> {
        let session = self.session()?;
        Ok(self.connector.connect(&session)?)
    }
}

/// Returns the client connected in `ensure_preconditions`
pub fn connected(client: &Option<Box<dyn ServiceManager>>) -> Result<&dyn ServiceManager> {
    client
        .as_deref()
        .ok_or_else(|| CliError::NotLoggedIn.into())
}
