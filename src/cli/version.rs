//! Version command

use std::rc::Rc;

use anyhow::{bail, Result};

use super::command::Command;
use super::context::Context;
use super::error::CliError;

/// Client version baked in at build time
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commit the binary was built from, if the build provided one
pub const COMMIT: Option<&str> = option_env!("SMCTL_COMMIT");

/// Prints the client version
pub struct VersionCommand {
    ctx: Rc<Context>,
    version: &'static str,
    commit: Option<&'static str>,
}

impl VersionCommand {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self::with_build(ctx, VERSION, COMMIT)
    }

    pub fn with_build(ctx: Rc<Context>, version: &'static str, commit: Option<&'static str>) -> Self {
        Self {
            ctx,
            version,
            commit,
        }
    }

    fn banner(&self) -> String {
        match self.commit.filter(|c| !c.is_empty()) {
            Some(commit) => format!("Service Manager Client {} ({})", self.version, commit),
            None => format!("Service Manager Client {}", self.version),
        }
    }
}

impl Command for VersionCommand {
    fn build(&self) -> clap::Command {
        clap::Command::new("version")
            .visible_alias("v")
            .about("Prints smctl version")
            .long_about("Prints the version of the Service Manager client.")
    }

    fn validate(&self, args: &[String]) -> Result<()> {
        if !args.is_empty() {
            bail!(CliError::InvalidArgs(format!(
                "unexpected arguments: {}",
                args.join(" ")
            )));
        }
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        self.ctx.output().line(self.banner())?;
        Ok(())
    }

    fn hide_usage(&self) -> bool {
        true
    }
}
