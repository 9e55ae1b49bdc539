//! Info command

use std::rc::Rc;

use anyhow::{bail, Result};
use tracing::debug;

use super::command::Command;
use super::context::Context;
use super::error::CliError;

/// Shown when no session is stored; not an error
pub const NO_SESSION_HINT: &str = "There is no logged user. Use \"smctl login\" to log in.";

/// Prints the stored session
pub struct InfoCommand {
    ctx: Rc<Context>,
}

impl InfoCommand {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self { ctx }
    }
}

impl Command for InfoCommand {
    fn build(&self) -> clap::Command {
        clap::Command::new("info")
            .visible_alias("i")
            .about("Prints information for logged user")
            .long_about("Prints the Service Manager URL and the user of the current session.")
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
        let output = self.ctx.output();

        let session = match self.ctx.config().load() {
            Ok(session) => session,
            Err(e) => {
                debug!(error = %e, "no session to show");
                if output.is_json() {
                    output.data(&serde_json::json!({ "logged_in": false }))?;
                } else {
                    output.line(NO_SESSION_HINT)?;
                }
                return Ok(());
            }
        };

        if output.is_json() {
            output.data(&serde_json::json!({
                "logged_in": true,
                "url": session.url,
                "user": session.user,
            }))?;
        } else {
            output.line(format!("Service Manager URL: {}", session.url))?;
            output.line(format!("Logged user: {}", session.user))?;
        }

        Ok(())
    }

    fn hide_usage(&self) -> bool {
        true
    }
}
