//! Platform commands

use std::rc::Rc;

use anyhow::{bail, Result};
use clap::{ArgMatches, Args, FromArgMatches};

use super::command::{positional_args, Command};
use super::context::{connected, Context};
use super::error::CliError;
use crate::client::ServiceManager;
use crate::domain::{Platform, PlatformUpdate};

fn find_platform(client: &dyn ServiceManager, name: &str) -> Result<Platform> {
    client
        .list_platforms()?
        .into_iter()
        .find(|p| p.name == name)
        .ok_or_else(|| {
            CliError::NotFound {
                kind: "platform",
                name: name.to_string(),
            }
            .into()
        })
}

fn platform_rows(platforms: &[Platform]) -> Vec<Vec<String>> {
    platforms
        .iter()
        .map(|p| {
            vec![
                p.id.clone().unwrap_or_default(),
                p.name.clone(),
                p.platform_type.clone(),
                p.description.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

const PLATFORM_HEADERS: [&str; 4] = ["ID", "NAME", "TYPE", "DESCRIPTION"];

#[derive(Args, Debug, Default)]
struct RegisterPlatformFlags {
    /// Description of the platform
    #[arg(short, long)]
    description: Option<String>,
}

/// Registers a platform: `register-platform NAME TYPE`
pub struct RegisterPlatformCommand {
    ctx: Rc<Context>,
    client: Option<Box<dyn ServiceManager>>,
    flags: RegisterPlatformFlags,
    args: Vec<String>,
}

impl RegisterPlatformCommand {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self {
            ctx,
            client: None,
            flags: RegisterPlatformFlags::default(),
            args: Vec::new(),
        }
    }
}

impl Command for RegisterPlatformCommand {
    fn build(&self) -> clap::Command {
        RegisterPlatformFlags::augment_args(
            clap::Command::new("register-platform")
                .visible_alias("rp")
                .about("Registers a platform")
                .long_about("Registers a platform: smctl register-platform NAME TYPE"),
        )
    }

    fn bind(&mut self, matches: &ArgMatches) -> Result<()> {
        self.flags = RegisterPlatformFlags::from_arg_matches(matches)?;
        self.args = positional_args(matches);
        Ok(())
    }

    fn validate(&self, args: &[String]) -> Result<()> {
        if args.len() != 2 {
            bail!(CliError::InvalidArgs(
                "name and type are required".to_string()
            ));
        }
        Ok(())
    }

    fn ensure_preconditions(&mut self) -> Result<()> {
        self.client = Some(self.ctx.client()?);
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let client = connected(&self.client)?;

        let platform = Platform {
            name: self.args[0].clone(),
            platform_type: self.args[1].clone(),
            description: self.flags.description.clone(),
            ..Default::default()
        };

        let created = client.register_platform(&platform)?;

        let output = self.ctx.output();
        if output.is_json() {
            output.data(&created)?;
            return Ok(());
        }

        output.success(&format!(
            "Platform registered with id: {}",
            created.id.clone().unwrap_or_default()
        ))?;
        // Credentials are only returned once, on registration
        if let Some(credentials) = &created.credentials {
            output.line(format!("Username: {}", credentials.basic.username))?;
            output.line(format!("Password: {}", credentials.basic.password))?;
        }
        Ok(())
    }
}

/// Lists registered platforms
pub struct ListPlatformsCommand {
    ctx: Rc<Context>,
    client: Option<Box<dyn ServiceManager>>,
}

impl ListPlatformsCommand {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self { ctx, client: None }
    }
}

impl Command for ListPlatformsCommand {
    fn build(&self) -> clap::Command {
        clap::Command::new("list-platforms")
            .visible_alias("get-platforms")
            .about("Lists platforms")
    }

    fn ensure_preconditions(&mut self) -> Result<()> {
        self.client = Some(self.ctx.client()?);
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let platforms = connected(&self.client)?.list_platforms()?;

        let output = self.ctx.output();
        if output.is_json() {
            output.data(&platforms)?;
        } else if platforms.is_empty() {
            output.line("There are no registered platforms.")?;
        } else {
            output.table(&PLATFORM_HEADERS, &platform_rows(&platforms))?;
        }
        Ok(())
    }
}

#[derive(Args, Debug, Default)]
struct UpdatePlatformFlags {
    /// New name of the platform
    #[arg(long)]
    name: Option<String>,

    /// New type of the platform
    #[arg(long = "type")]
    platform_type: Option<String>,

    /// New description of the platform
    #[arg(short, long)]
    description: Option<String>,
}

impl UpdatePlatformFlags {
    fn to_update(&self) -> PlatformUpdate {
        PlatformUpdate {
            name: self.name.clone(),
            platform_type: self.platform_type.clone(),
            description: self.description.clone(),
        }
    }
}

/// Updates a platform found by name
pub struct UpdatePlatformCommand {
    ctx: Rc<Context>,
    client: Option<Box<dyn ServiceManager>>,
    flags: UpdatePlatformFlags,
    args: Vec<String>,
}

impl UpdatePlatformCommand {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self {
            ctx,
            client: None,
            flags: UpdatePlatformFlags::default(),
            args: Vec::new(),
        }
    }
}

impl Command for UpdatePlatformCommand {
    fn build(&self) -> clap::Command {
        UpdatePlatformFlags::augment_args(
            clap::Command::new("update-platform")
                .visible_alias("up")
                .about("Updates a platform"),
        )
    }

    fn bind(&mut self, matches: &ArgMatches) -> Result<()> {
        self.flags = UpdatePlatformFlags::from_arg_matches(matches)?;
        self.args = positional_args(matches);
        Ok(())
    }

    fn validate(&self, args: &[String]) -> Result<()> {
        if args.len() != 1 {
            bail!(CliError::InvalidArgs("platform name is required".to_string()));
        }
        if self.flags.to_update().is_empty() {
            bail!(CliError::InvalidArgs(
                "at least one of --name, --type or --description must be provided".to_string()
            ));
        }
        Ok(())
    }

    fn ensure_preconditions(&mut self) -> Result<()> {
        self.client = Some(self.ctx.client()?);
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let client = connected(&self.client)?;
        let platform = find_platform(client, &self.args[0])?;
        let id = platform.id.unwrap_or_default();

        let updated = client.update_platform(&id, &self.flags.to_update())?;

        let output = self.ctx.output();
        if output.is_json() {
            output.data(&updated)?;
        } else {
            output.table(&PLATFORM_HEADERS, &platform_rows(&[updated]))?;
        }
        Ok(())
    }
}

/// Deletes platforms by name
pub struct DeletePlatformCommand {
    ctx: Rc<Context>,
    client: Option<Box<dyn ServiceManager>>,
    names: Vec<String>,
}

impl DeletePlatformCommand {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self {
            ctx,
            client: None,
            names: Vec::new(),
        }
    }
}

impl Command for DeletePlatformCommand {
    fn build(&self) -> clap::Command {
        clap::Command::new("delete-platform")
            .visible_alias("dp")
            .about("Deletes platforms")
            .long_about("Deletes one or more platforms: smctl delete-platform NAME...")
    }

    fn bind(&mut self, matches: &ArgMatches) -> Result<()> {
        self.names = positional_args(matches);
        Ok(())
    }

    fn validate(&self, args: &[String]) -> Result<()> {
        if args.is_empty() {
            bail!(CliError::InvalidArgs(
                "at least one platform name is required".to_string()
            ));
        }
        Ok(())
    }

    fn ensure_preconditions(&mut self) -> Result<()> {
        self.client = Some(self.ctx.client()?);
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let client = connected(&self.client)?;

        for name in &self.names {
            let platform = find_platform(client, name)?;
            client.delete_platform(&platform.id.unwrap_or_default())?;
            self.ctx
                .output()
                .success(&format!("Platform with name: {} successfully deleted", name))?;
        }
        Ok(())
    }
}
