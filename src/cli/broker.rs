//! Broker commands

use std::rc::Rc;

use anyhow::{bail, Result};
use clap::{ArgMatches, Args, FromArgMatches};

use super::command::{positional_args, Command};
use super::context::{connected, Context};
use super::error::CliError;
use crate::client::ServiceManager;
use crate::domain::{BasicCredentials, Broker, BrokerUpdate, Credentials};

fn find_broker(client: &dyn ServiceManager, name: &str) -> Result<Broker> {
    client
        .list_brokers()?
        .into_iter()
        .find(|b| b.name == name)
        .ok_or_else(|| {
            CliError::NotFound {
                kind: "broker",
                name: name.to_string(),
            }
            .into()
        })
}

fn broker_rows(brokers: &[Broker]) -> Vec<Vec<String>> {
    brokers
        .iter()
        .map(|b| {
            vec![
                b.id.clone().unwrap_or_default(),
                b.name.clone(),
                b.broker_url.clone(),
                b.description.clone().unwrap_or_default(),
            ]
        })
        .collect()
}

const BROKER_HEADERS: [&str; 4] = ["ID", "NAME", "URL", "DESCRIPTION"];

#[derive(Args, Debug, Default)]
struct RegisterBrokerFlags {
    /// Description of the broker
    #[arg(short, long)]
    description: Option<String>,

    /// Broker credentials as <username:password>
    #[arg(short, long)]
    basic: Option<String>,
}

/// Registers a broker: `register-broker NAME URL --basic user:pass`
pub struct RegisterBrokerCommand {
    ctx: Rc<Context>,
    client: Option<Box<dyn ServiceManager>>,
    flags: RegisterBrokerFlags,
    args: Vec<String>,
}

impl RegisterBrokerCommand {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self {
            ctx,
            client: None,
            flags: RegisterBrokerFlags::default(),
            args: Vec::new(),
        }
    }
}

impl Command for RegisterBrokerCommand {
    fn build(&self) -> clap::Command {
        RegisterBrokerFlags::augment_args(
            clap::Command::new("register-broker")
                .visible_alias("rb")
                .about("Registers a broker")
                .long_about("Registers a broker: smctl register-broker NAME URL --basic USER:PASSWORD"),
        )
    }

    fn bind(&mut self, matches: &ArgMatches) -> Result<()> {
        self.flags = RegisterBrokerFlags::from_arg_matches(matches)?;
        self.args = positional_args(matches);
        Ok(())
    }

    fn validate(&self, args: &[String]) -> Result<()> {
        if args.len() != 2 {
            bail!(CliError::InvalidArgs(
                "name and URL are required".to_string()
            ));
        }
        match self.flags.basic.as_deref() {
            None => bail!(CliError::MissingFlag("basic")),
            Some(basic) if BasicCredentials::parse(basic).is_none() => {
                bail!(CliError::InvalidArgs(
                    "basic credentials must be in the form username:password".to_string()
                ))
            }
            Some(_) => Ok(()),
        }
    }

    fn ensure_preconditions(&mut self) -> Result<()> {
        self.client = Some(self.ctx.client()?);
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let client = connected(&self.client)?;

        let broker = Broker {
            name: self.args[0].clone(),
            broker_url: self.args[1].clone(),
            description: self.flags.description.clone(),
            credentials: self
                .flags
                .basic
                .as_deref()
                .and_then(BasicCredentials::parse)
                .map(|basic| Credentials { basic }),
            ..Default::default()
        };

        let created = client.register_broker(&broker)?;

        let output = self.ctx.output();
        if output.is_json() {
            output.data(&created)?;
        } else {
            output.success(&format!(
                "Broker registered with id: {}",
                created.id.unwrap_or_default()
            ))?;
        }
        Ok(())
    }
}

/// Lists registered brokers
pub struct ListBrokersCommand {
    ctx: Rc<Context>,
    client: Option<Box<dyn ServiceManager>>,
}

impl ListBrokersCommand {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self { ctx, client: None }
    }
}

impl Command for ListBrokersCommand {
    fn build(&self) -> clap::Command {
        clap::Command::new("list-brokers")
            .visible_alias("get-brokers")
            .about("Lists brokers")
    }

    fn ensure_preconditions(&mut self) -> Result<()> {
        self.client = Some(self.ctx.client()?);
        Ok(())
    }

    fn run(&mut self) -> Result<()> {
        let brokers = connected(&self.client)?.list_brokers()?;

        let output = self.ctx.output();
        if output.is_json() {
            output.data(&brokers)?;
        } else if brokers.is_empty() {
            output.line("There are no registered brokers.")?;
        } else {
            output.table(&BROKER_HEADERS, &broker_rows(&brokers))?;
        }
        Ok(())
    }
}

#[derive(Args, Debug, Default)]
struct UpdateBrokerFlags {
    /// New name of the broker
    #[arg(long)]
    name: Option<String>,

    /// New URL of the broker
    #[arg(long)]
    url: Option<String>,

    /// New description of the broker
    #[arg(short, long)]
    description: Option<String>,
}

impl UpdateBrokerFlags {
    fn to_update(&self) -> BrokerUpdate {
        BrokerUpdate {
            name: self.name.clone(),
            broker_url: self.url.clone(),
            description: self.description.clone(),
        }
    }
}

/// Updates a broker found by name
pub struct UpdateBrokerCommand {
    ctx: Rc<Context>,
    client: Option<Box<dyn ServiceManager>>,
    flags: UpdateBrokerFlags,
    args: Vec<String>,
}

impl UpdateBrokerCommand {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self {
            ctx,
            client: None,
            flags: UpdateBrokerFlags::default(),
            args: Vec::new(),
        }
    }
}

impl Command for UpdateBrokerCommand {
    fn build(&self) -> clap::Command {
        UpdateBrokerFlags::augment_args(
            clap::Command::new("update-broker")
                .visible_alias("ub")
                .about("Updates a broker"),
        )
    }

    fn bind(&mut self, matches: &ArgMatches) -> Result<()> {
        self.flags = UpdateBrokerFlags::from_arg_matches(matches)?;
        self.args = positional_args(matches);
        Ok(())
    }

    fn validate(&self, args: &[String]) -> Result<()> {
        if args.len() != 1 {
            bail!(CliError::InvalidArgs("broker name is required".to_string()));
        }
        if self.flags.to_update().is_empty() {
            bail!(CliError::InvalidArgs(
                "at least one of --name, --url or --description must be provided".to_string()
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
        let broker = find_broker(client, &self.args[0])?;
        let id = broker.id.unwrap_or_default();

        let updated = client.update_broker(&id, &self.flags.to_update())?;

        let output = self.ctx.output();
        if output.is_json() {
            output.data(&updated)?;
        } else {
            output.table(&BROKER_HEADERS, &broker_rows(&[updated]))?;
        }
        Ok(())
    }
}

/// Deletes brokers by name
pub struct DeleteBrokerCommand {
    ctx: Rc<Context>,
    client: Option<Box<dyn ServiceManager>>,
    names: Vec<String>,
}

impl DeleteBrokerCommand {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self {
            ctx,
            client: None,
            names: Vec::new(),
        }
    }
}

impl Command for DeleteBrokerCommand {
    fn build(&self) -> clap::Command {
        clap::Command::new("delete-broker")
            .visible_alias("db")
            .about("Deletes brokers")
            .long_about("Deletes one or more brokers: smctl delete-broker NAME...")
    }

    fn bind(&mut self, matches: &ArgMatches) -> Result<()> {
        self.names = positional_args(matches);
        Ok(())
    }

    fn validate(&self, args: &[String]) -> Result<()> {
        if args.is_empty() {
            bail!(CliError::InvalidArgs(
                "at least one broker name is required".to_string()
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
            let broker = find_broker(client, name)?;
            client.delete_broker(&broker.id.unwrap_or_default())?;
            self.ctx
                .output()
                .success(&format!("Broker with name: {} successfully deleted", name))?;
        }
        Ok(())
    }
}
