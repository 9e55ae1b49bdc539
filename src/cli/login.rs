//! Login command

use std::rc::Rc;

use anyhow::{bail, Result};
use clap::{ArgMatches, Args, FromArgMatches};
use url::Url;

use super::command::Command;
use super::context::Context;
use super::error::CliError;
use super::input::Input;
use crate::domain::SessionConfig;

#[derive(Args, Debug, Default)]
struct LoginFlags {
    /// Base URL of the Service Manager
    #[arg(short = 'a', long)]
    url: Option<String>,

    /// User ID
    #[arg(short, long)]
    user: Option<String>,

    /// Password
    #[arg(short, long)]
    password: Option<String>,
}

/// Authenticates against a Service Manager and stores the session
pub struct LoginCommand {
    ctx: Rc<Context>,
    input: Box<dyn Input>,
    flags: LoginFlags,
}

impl LoginCommand {
    pub fn new(ctx: Rc<Context>, input: Box<dyn Input>) -> Self {
        Self {
            ctx,
            input,
            flags: LoginFlags::default(),
        }
    }

    fn read_user(&mut self) -> Result<String> {
        let user = match self.flags.user.clone() {
            Some(user) => user,
            None => {
                self.ctx.output().prompt("User: ")?;
                self.input.read_line()?
            }
        };
        non_empty(user)
    }

    fn read_password(&mut self) -> Result<String> {
        let password = match self.flags.password.clone() {
            Some(password) => password,
            None => {
                self.ctx.output().prompt("Password: ")?;
                self.input.read_password()?
            }
        };
        non_empty(password)
    }
}

impl Command for LoginCommand {
    fn build(&self) -> clap::Command {
        LoginFlags::augment_args(
            clap::Command::new("login")
                .visible_alias("l")
                .about("Logs user in")
                .long_about("Connects to a Service Manager and logs the user in."),
        )
    }

    fn bind(&mut self, matches: &ArgMatches) -> Result<()> {
        self.flags = LoginFlags::from_arg_matches(matches)?;
        Ok(())
    }

    fn validate(&self, args: &[String]) -> Result<()> {
        if self.flags.url.as_deref().map_or(true, str::is_empty) {
            bail!(CliError::MissingFlag("URL"));
        }
        if !args.is_empty() {
            bail!(CliError::InvalidArgs(format!(
                "unexpected arguments: {}",
                args.join(" ")
            )));
        }
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let url = match self.flags.url.clone() {
            Some(url) => url,
            None => bail!(CliError::MissingFlag("URL")),
        };
        if !is_valid_url(&url) {
            bail!(CliError::InvalidUrl);
        }

        let user = self.read_user()?;
        let password = self.read_password()?;

        self.ctx
            .verbose(format!("Connecting to Service Manager: {}", url))?;

        let session = SessionConfig::with_basic_auth(url, &user, &password);
        self.ctx.connector().connect(&session)?;
        self.ctx.config().save(&session)?;

        self.ctx.output().success("Logged in successfully.")?;
        Ok(())
    }
}

fn non_empty(value: String) -> Result<String> {
    if value.trim().is_empty() {
        bail!(CliError::EmptyCredentials);
    }
    Ok(value)
}

/// Accepts absolute http(s) URLs with a host
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
        .unwrap_or(false)
}
