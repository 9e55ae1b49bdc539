//! Command lifecycle
//!
//! Every smctl command implements [`Command`]. The [`Lifecycle`] adapter
//! turns it into a clap node and drives a single invocation through:
//!
//! 1. preparation gates added by the command's [`Group`] policy
//! 2. `bind` (parsed flags into the command)
//! 3. `validate` (argument shape)
//! 4. `ensure_preconditions`
//! 5. `run`
//!
//! The first failing step ends the invocation. Output already written by
//! earlier steps stays on the sink.

use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches};
use tracing::debug;

use super::context::Context;
use super::error::UsageError;
use super::BIN_NAME;

/// Id of the hidden trailing positional every command node receives
const POSITIONAL_ARGS: &str = "args";

/// A single smctl command
///
/// Only `build` and `run` are required; the other steps default to no-ops.
pub trait Command {
    /// Declares the clap node: name, aliases, help text and flags
    fn build(&self) -> clap::Command;

    /// Copies parsed flag values into the command
    fn bind(&mut self, _matches: &ArgMatches) -> Result<()> {
        Ok(())
    }

    /// Checks the shape of the positional arguments and bound flags
    fn validate(&self, _args: &[String]) -> Result<()> {
        Ok(())
    }

    /// Checks state the command needs beyond its arguments
    fn ensure_preconditions(&mut self) -> Result<()> {
        Ok(())
    }

    fn run(&mut self) -> Result<()>;

    /// Report argument errors without the usage block
    fn hide_usage(&self) -> bool {
        false
    }
}

/// Positional arguments collected by the hidden catch-all
pub fn positional_args(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>(POSITIONAL_ARGS)
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}

/// A check run before a command's own steps
pub type Gate = Box<dyn Fn(&Context) -> Result<()>>;

/// A command adapted to the dispatcher
pub struct Lifecycle {
    node: clap::Command,
    command: Box<dyn Command>,
    gates: Vec<Gate>,
}

impl Lifecycle {
    pub fn new(command: Box<dyn Command>) -> Self {
        let node = command.build();
        let bin_name = format!("{} {}", BIN_NAME, node.get_name());
        let node = node.bin_name(bin_name).arg(
            Arg::new(POSITIONAL_ARGS)
                .num_args(0..)
                .action(ArgAction::Append)
                .hide(true),
        );

        Self {
            node,
            command,
            gates: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.node.get_name()
    }

    /// Returns true if `token` is the command name or one of its aliases
    pub fn matches_name(&self, token: &str) -> bool {
        self.node.get_name() == token || self.node.get_all_aliases().any(|a| a == token)
    }

    pub fn node(&self) -> &clap::Command {
        &self.node
    }

    pub fn hides_usage(&self) -> bool {
        self.command.hide_usage()
    }

    /// Adds a gate that must pass before the command binds its flags
    pub fn gate(&mut self, gate: impl Fn(&Context) -> Result<()> + 'static) {
        self.gates.push(Box::new(gate));
    }

    /// Runs one invocation with the sub-matches of this command
    pub fn execute(&mut self, ctx: &Context, matches: &ArgMatches) -> Result<()> {
        debug!(command = self.name(), gates = self.gates.len(), "preparing");
        for gate in &self.gates {
            gate(ctx)?;
        }

        let args = positional_args(matches);

        debug!(command = self.name(), ?args, "validating");
        if let Err(e) = self.command.bind(matches) {
            return Err(self.argument_error(e));
        }
        if let Err(e) = self.command.validate(&args) {
            return Err(self.argument_error(e));
        }

        self.command.ensure_preconditions()?;

        debug!(command = self.name(), "running");
        self.command.run()
    }

    fn argument_error(&self, error: anyhow::Error) -> anyhow::Error {
        if self.command.hide_usage() {
            return error;
        }

        let usage = self.node.clone().render_usage().to_string();
        UsageError {
            error,
            usage: usage.trim_end().to_string(),
        }
        .into()
    }
}

/// Preparation policy applied to every command of a group at registration
pub type Preparator = fn(&mut Lifecycle);

/// Commands sharing one preparation policy
pub struct Group {
    pub prepare: Preparator,
    pub commands: Vec<Box<dyn Command>>,
}

impl Group {
    pub fn new(prepare: Preparator, commands: Vec<Box<dyn Command>>) -> Self {
        Self { prepare, commands }
    }
}

/// Policy for commands that need a stored session
pub fn require_login(lifecycle: &mut Lifecycle) {
    lifecycle.gate(|ctx| ctx.session().map(|_| ()));
}

/// Policy for commands that work without a session
pub fn no_login(_lifecycle: &mut Lifecycle) {}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use anyhow::bail;

    use super::*;
    use crate::cli::error::CliError;
    use crate::cli::testing::{test_context, MemoryConfiguration};
    use crate::domain::SessionConfig;

    /// Records which lifecycle steps ran
    struct Probe {
        calls: Rc<RefCell<Vec<&'static str>>>,
        fail_at: Option<&'static str>,
        hide_usage: bool,
    }

    impl Probe {
        fn new(fail_at: Option<&'static str>) -> (Self, Rc<RefCell<Vec<&'static str>>>) {
            let calls = Rc::new(RefCell::new(Vec::new()));
            let probe = Self {
                calls: calls.clone(),
                fail_at,
                hide_usage: false,
            };
            (probe, calls)
        }

        fn step(&self, name: &'static str) -> Result<()> {
            self.calls.borrow_mut().push(name);
            if self.fail_at == Some(name) {
                bail!("{} failed", name);
            }
            Ok(())
        }
    }

    impl Command for Probe {
        fn build(&self) -> clap::Command {
            clap::Command::new("probe").alias("p")
        }

        fn bind(&mut self, _matches: &ArgMatches) -> Result<()> {
            self.step("bind")
        }

        fn validate(&self, _args: &[String]) -> Result<()> {
            self.step("validate")
        }

        fn ensure_preconditions(&mut self) -> Result<()> {
            self.step("preconditions")
        }

        fn run(&mut self) -> Result<()> {
            self.step("run")
        }

        fn hide_usage(&self) -> bool {
            self.hide_usage
        }
    }

    fn sub_matches(lifecycle: &Lifecycle, args: &[&str]) -> ArgMatches {
        let mut argv = vec![lifecycle.name()];
        argv.extend_from_slice(args);
        lifecycle.node().clone().try_get_matches_from(argv).unwrap()
    }

    #[test]
    fn steps_run_in_order() {
        let (ctx, _, _) = test_context(MemoryConfiguration::empty());
        let (probe, calls) = Probe::new(None);
        let mut lifecycle = Lifecycle::new(Box::new(probe));
        let matches = sub_matches(&lifecycle, &[]);

        lifecycle.execute(&ctx, &matches).unwrap();

        assert_eq!(
            *calls.borrow(),
            vec!["bind", "validate", "preconditions", "run"]
        );
    }

    #[test]
    fn failure_short_circuits_later_steps() {
        for (fail_at, expected) in [
            ("bind", vec!["bind"]),
            ("validate", vec!["bind", "validate"]),
            ("preconditions", vec!["bind", "validate", "preconditions"]),
        ] {
            let (ctx, _, _) = test_context(MemoryConfiguration::empty());
            let (probe, calls) = Probe::new(Some(fail_at));
            let mut lifecycle = Lifecycle::new(Box::new(probe));
            let matches = sub_matches(&lifecycle, &[]);

            let err = lifecycle.execute(&ctx, &matches).unwrap_err();

            assert!(err.to_string().contains(&format!("{} failed", fail_at)));
            assert_eq!(*calls.borrow(), expected);
        }
    }

    #[test]
    fn validation_error_carries_usage() {
        let (ctx, _, _) = test_context(MemoryConfiguration::empty());
        let (probe, _) = Probe::new(Some("validate"));
        let mut lifecycle = Lifecycle::new(Box::new(probe));
        let matches = sub_matches(&lifecycle, &[]);

        let err = lifecycle.execute(&ctx, &matches).unwrap_err();

        assert!(err.downcast_ref::<UsageError>().is_some());
        assert!(err.to_string().contains("Usage: smctl probe"));
    }

    #[test]
    fn hidden_usage_returns_bare_error() {
        let (ctx, _, _) = test_context(MemoryConfiguration::empty());
        let (mut probe, _) = Probe::new(Some("validate"));
        probe.hide_usage = true;
        let mut lifecycle = Lifecycle::new(Box::new(probe));
        let matches = sub_matches(&lifecycle, &[]);

        let err = lifecycle.execute(&ctx, &matches).unwrap_err();

        assert_eq!(err.to_string(), "validate failed");
    }

    #[test]
    fn run_errors_never_carry_usage() {
        let (ctx, _, _) = test_context(MemoryConfiguration::empty());
        let (probe, _) = Probe::new(Some("run"));
        let mut lifecycle = Lifecycle::new(Box::new(probe));
        let matches = sub_matches(&lifecycle, &[]);

        let err = lifecycle.execute(&ctx, &matches).unwrap_err();

        assert_eq!(err.to_string(), "run failed");
    }

    #[test]
    fn require_login_blocks_before_bind() {
        let (ctx, _, _) = test_context(MemoryConfiguration::empty());
        let (probe, calls) = Probe::new(None);
        let mut lifecycle = Lifecycle::new(Box::new(probe));
        require_login(&mut lifecycle);
        let matches = sub_matches(&lifecycle, &["anything"]);

        let err = lifecycle.execute(&ctx, &matches).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::NotLoggedIn)
        ));
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn require_login_passes_with_session() {
        let session = SessionConfig::with_basic_auth("http://sm.example.com", "admin", "admin");
        let (ctx, _, _) = test_context(MemoryConfiguration::with_session(session));
        let (probe, calls) = Probe::new(None);
        let mut lifecycle = Lifecycle::new(Box::new(probe));
        require_login(&mut lifecycle);
        let matches = sub_matches(&lifecycle, &[]);

        lifecycle.execute(&ctx, &matches).unwrap();

        assert_eq!(calls.borrow().last(), Some(&"run"));
    }

    #[test]
    fn positional_args_are_collected() {
        let (probe, _) = Probe::new(None);
        let lifecycle = Lifecycle::new(Box::new(probe));
        let matches = sub_matches(&lifecycle, &["one", "two"]);

        assert_eq!(positional_args(&matches), vec!["one", "two"]);
        assert!(lifecycle.matches_name("p"));
        assert!(!lifecycle.matches_name("q"));
    }
}
