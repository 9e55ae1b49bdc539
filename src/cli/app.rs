//! Root dispatcher
//!
//! Owns the root clap command, the adapted commands registered on it and
//! the shared context. Registration order is declaration order.

use std::ffi::OsString;
use std::rc::Rc;

use anyhow::{anyhow, Result};
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{value_parser, Arg, ArgAction, ArgMatches};
use tracing::debug;

use super::broker::{DeleteBrokerCommand, ListBrokersCommand, RegisterBrokerCommand, UpdateBrokerCommand};
use super::command::{no_login, require_login, Command, Group, Lifecycle};
use super::context::Context;
use super::error::CliError;
use super::info::InfoCommand;
use super::input::TerminalInput;
use super::login::LoginCommand;
use super::output::{Output, OutputFormat};
use super::platform::{
    DeletePlatformCommand, ListPlatformsCommand, RegisterPlatformCommand, UpdatePlatformCommand,
};
use super::version::{VersionCommand, VERSION};
use super::BIN_NAME;
use crate::client::HttpConnector;
use crate::storage::FileConfiguration;

pub struct App {
    ctx: Rc<Context>,
    root: clap::Command,
    commands: Vec<Lifecycle>,
}

impl App {
    pub fn new(ctx: Rc<Context>) -> Self {
        Self {
            ctx,
            root: root_command(),
            commands: Vec::new(),
        }
    }

    /// Adapts every command of every group and attaches it to the root
    pub fn prepare(mut self, groups: Vec<Group>) -> Self {
        for group in groups {
            for command in group.commands {
                let mut lifecycle = Lifecycle::new(command);
                (group.prepare)(&mut lifecycle);
                debug!(command = lifecycle.name(), "registered");
                self.root = self.root.subcommand(lifecycle.node().clone());
                self.commands.push(lifecycle);
            }
        }
        self
    }

    /// Parses `args` (binary name first) and runs the matched command
    pub fn execute<I, T>(&mut self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();

        let matches = match self.root.try_get_matches_from_mut(args.clone()) {
            Ok(matches) => matches,
            Err(e) => return self.parse_error(e, &args),
        };

        let Some((name, sub_matches)) = matches.subcommand() else {
            let help = self.root.render_help().to_string();
            self.ctx.output().raw(&help)?;
            return Ok(());
        };

        // Global flags propagate down, so the subcommand holds their final values
        apply_global_flags(&self.ctx, sub_matches);
        crate::logging::init(self.ctx.is_verbose());

        let lifecycle = self
            .commands
            .iter_mut()
            .find(|c| c.name() == name)
            .ok_or_else(|| CliError::UnknownCommand(name.to_string()))?;

        lifecycle.execute(&self.ctx, sub_matches)
    }

    fn parse_error(&self, error: clap::Error, args: &[OsString]) -> Result<()> {
        match error.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                self.ctx.output().raw(&error.render().to_string())?;
                Ok(())
            }
            ErrorKind::InvalidSubcommand => {
                let name = match error.get(ContextKind::InvalidSubcommand) {
                    Some(ContextValue::String(name)) => name.clone(),
                    _ => String::new(),
                };
                Err(CliError::UnknownCommand(name).into())
            }
            _ => {
                let rendered = error.render().to_string();
                let message = rendered.trim_start_matches("error: ").trim_end();

                if self.scope(args).is_some_and(Lifecycle::hides_usage) {
                    let first_line = message.lines().next().unwrap_or_default();
                    return Err(anyhow!(first_line.to_string()));
                }
                Err(anyhow!(message.to_string()))
            }
        }
    }

    /// The registered command named by the first matching token
    fn scope(&self, args: &[OsString]) -> Option<&Lifecycle> {
        args.iter().skip(1).find_map(|arg| {
            let token = arg.to_str()?;
            self.commands.iter().find(|c| c.matches_name(token))
        })
    }
}

fn root_command() -> clap::Command {
    clap::Command::new(BIN_NAME)
        .about("Service Manager command line client")
        .long_about(
            "smctl controls a Service Manager instance: log in once, then register, \
             list, update and delete brokers and platforms.",
        )
        .version(VERSION)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Enable verbose output"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .global(true)
                .value_parser(value_parser!(OutputFormat))
                .default_value("text")
                .help("Output format"),
        )
}

fn apply_global_flags(ctx: &Context, matches: &ArgMatches) {
    let verbose = matches.get_flag("verbose");
    let format = matches
        .get_one::<OutputFormat>("format")
        .copied()
        .unwrap_or_default();
    ctx.apply_flags(verbose, format);
}

/// Builds the smctl command tree on top of `ctx`
pub fn smctl(ctx: Rc<Context>) -> App {
    let login: Box<dyn Command> =
        Box::new(LoginCommand::new(ctx.clone(), Box::new(TerminalInput)));

    App::new(ctx.clone()).prepare(vec![
        Group::new(
            no_login,
            vec![
                login,
                Box::new(InfoCommand::new(ctx.clone())),
                Box::new(VersionCommand::new(ctx.clone())),
            ],
        ),
        Group::new(
            require_login,
            vec![
                Box::new(RegisterBrokerCommand::new(ctx.clone())) as Box<dyn Command>,
                Box::new(ListBrokersCommand::new(ctx.clone())),
                Box::new(UpdateBrokerCommand::new(ctx.clone())),
                Box::new(DeleteBrokerCommand::new(ctx.clone())),
                Box::new(RegisterPlatformCommand::new(ctx.clone())),
                Box::new(ListPlatformsCommand::new(ctx.clone())),
                Box::new(UpdatePlatformCommand::new(ctx.clone())),
                Box::new(DeletePlatformCommand::new(ctx.clone())),
            ],
        ),
    ])
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let config = FileConfiguration::from_env()?;
    let ctx = Rc::new(Context::new(
        Output::stdout(),
        Box::new(config),
        Box::new(HttpConnector),
    ));

    smctl(ctx).execute(std::env::args_os())
}
