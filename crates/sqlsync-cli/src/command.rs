//! Management-command framework for the sqlsync CLI.
//!
//! This module provides the [`ManagementCommand`] trait for defining CLI
//! verbs and [`CommandRegistry`] for registering and dispatching them.
//!
//! ## Defining a Custom Command
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use sqlsync_cli::command::ManagementCommand;
//! use sqlsync_core::{Settings, SyncError};
//!
//! struct PingCommand;
//!
//! #[async_trait]
//! impl ManagementCommand for PingCommand {
//!     fn name(&self) -> &str { "ping" }
//!     fn help(&self) -> &str { "Print pong" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         _settings: &Settings,
//!     ) -> Result<(), SyncError> {
//!         println!("pong");
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::BTreeMap;

use async_trait::async_trait;

use sqlsync_core::{Settings, SyncError};

/// A CLI verb that can be registered and invoked through the registry.
///
/// Implementations define a name, help text, optional arguments, and an
/// async handler. All commands must be `Send + Sync`.
#[async_trait]
pub trait ManagementCommand: Send + Sync {
    /// Returns the name of this command (used to invoke it from the CLI).
    fn name(&self) -> &str;

    /// Returns a short help description for this command.
    fn help(&self) -> &str;

    /// Adds custom arguments to the clap command.
    ///
    /// The default implementation returns the command unchanged.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Executes the command with the given argument matches and settings.
    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), SyncError>;
}

/// A registry of management commands, the central dispatcher for the
/// sqlsync CLI.
///
/// Commands are keyed by name in a sorted map, so listing and CLI
/// construction come out in stable alphabetical order for free.
#[derive(Default)]
pub struct CommandRegistry {
    commands: BTreeMap<String, Box<dyn ManagementCommand>>,
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Registers a management command, replacing any previous command with
    /// the same name.
    pub fn register(&mut self, command: Box<dyn ManagementCommand>) {
        self.commands.insert(command.name().to_string(), command);
    }

    /// Returns the command registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&dyn ManagementCommand> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns every registered command name, alphabetically.
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds a top-level clap `Command` containing all registered
    /// subcommands.
    ///
    /// An unknown verb makes clap print usage and error out without running
    /// anything.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("sqlsync")
            .about("Schema-migration synchronization across named database environments")
            .subcommand_required(true);

        for (name, cmd) in &self.commands {
            // clap requires &'static str for command names. Commands are
            // registered once at startup, so the leak is bounded.
            let static_name: &'static str = Box::leak(name.clone().into_boxed_str());
            let subcmd = clap::Command::new(static_name).about(cmd.help().to_string());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Executes the command identified by the given argument matches.
    pub async fn execute(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), SyncError> {
        let (name, sub_matches) = matches
            .subcommand()
            .ok_or_else(|| SyncError::Configuration("No subcommand specified".to_string()))?;

        let cmd = self
            .get(name)
            .ok_or_else(|| SyncError::Configuration(format!("Unknown command: {name}")))?;

        cmd.handle(sub_matches, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// A verb that records how often its handler ran, so dispatch can be
    /// observed from outside.
    struct CountingCommand {
        verb: &'static str,
        invocations: Arc<AtomicUsize>,
    }

    fn counting(verb: &'static str) -> (Box<CountingCommand>, Arc<AtomicUsize>) {
        let invocations = Arc::new(AtomicUsize::new(0));
        let cmd = Box::new(CountingCommand {
            verb,
            invocations: Arc::clone(&invocations),
        });
        (cmd, invocations)
    }

    #[async_trait]
    impl ManagementCommand for CountingCommand {
        fn name(&self) -> &str {
            self.verb
        }

        fn help(&self) -> &str {
            "Counts how often it runs"
        }

        fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
            cmd.arg(
                clap::Arg::new("dry-run")
                    .long("dry-run")
                    .action(clap::ArgAction::SetTrue),
            )
        }

        async fn handle(
            &self,
            _matches: &clap::ArgMatches,
            _settings: &Settings,
        ) -> Result<(), SyncError> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// A verb whose handler fails with a typed, environment-scoped error.
    struct BrokenLedgerCommand;

    #[async_trait]
    impl ManagementCommand for BrokenLedgerCommand {
        fn name(&self) -> &str {
            "repair"
        }

        fn help(&self) -> &str {
            "Always fails with a tracking error"
        }

        async fn handle(
            &self,
            _matches: &clap::ArgMatches,
            _settings: &Settings,
        ) -> Result<(), SyncError> {
            Err(SyncError::Tracking {
                environment: "dev".into(),
                message: "ledger unreadable".into(),
            })
        }
    }

    // ── Registration ────────────────────────────────────────────────

    #[test]
    fn test_empty_registry() {
        let registry = CommandRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
        assert!(registry.get("anything").is_none());
    }

    #[test]
    fn test_listing_is_sorted_regardless_of_registration_order() {
        let mut registry = CommandRegistry::new();
        registry.register(counting("verify").0);
        registry.register(counting("apply").0);
        registry.register(Box::new(BrokenLedgerCommand));

        assert_eq!(registry.list_commands(), vec!["apply", "repair", "verify"]);
    }

    #[tokio::test]
    async fn test_reregistering_a_verb_replaces_it() {
        let (first, first_count) = counting("verify");
        let (second, second_count) = counting("verify");

        let mut registry = CommandRegistry::new();
        registry.register(first);
        registry.register(second);
        assert_eq!(registry.len(), 1);

        let matches = registry
            .build_cli()
            .try_get_matches_from(["sqlsync", "verify"])
            .unwrap();
        registry.execute(&matches, &Settings::default()).await.unwrap();

        assert_eq!(first_count.load(Ordering::SeqCst), 0);
        assert_eq!(second_count.load(Ordering::SeqCst), 1);
    }

    // ── Dispatch ────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_dispatch_reaches_the_named_verb_only() {
        let (verify, verify_count) = counting("verify");
        let (apply, apply_count) = counting("apply");

        let mut registry = CommandRegistry::new();
        registry.register(verify);
        registry.register(apply);

        let matches = registry
            .build_cli()
            .try_get_matches_from(["sqlsync", "verify"])
            .unwrap();
        registry.execute(&matches, &Settings::default()).await.unwrap();

        assert_eq!(verify_count.load(Ordering::SeqCst), 1);
        assert_eq!(apply_count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_handler_errors_surface_with_their_variant() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(BrokenLedgerCommand));

        let matches = registry
            .build_cli()
            .try_get_matches_from(["sqlsync", "repair"])
            .unwrap();
        let result = registry.execute(&matches, &Settings::default()).await;
        assert!(matches!(result, Err(SyncError::Tracking { .. })));
    }

    #[tokio::test]
    async fn test_execute_without_subcommand_is_a_configuration_error() {
        let registry = CommandRegistry::new();
        // Matches from a CLI that does not require a subcommand.
        let matches = clap::Command::new("sqlsync")
            .try_get_matches_from(["sqlsync"])
            .unwrap();

        let result = registry.execute(&matches, &Settings::default()).await;
        assert!(matches!(result, Err(SyncError::Configuration(_))));
    }

    // ── CLI construction ────────────────────────────────────────────

    #[test]
    fn test_unknown_verb_is_rejected_at_parse_time() {
        let mut registry = CommandRegistry::new();
        registry.register(counting("verify").0);

        let result = registry
            .build_cli()
            .try_get_matches_from(["sqlsync", "teleport"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_per_verb_arguments_parse() {
        let mut registry = CommandRegistry::new();
        registry.register(counting("verify").0);

        let matches = registry
            .build_cli()
            .try_get_matches_from(["sqlsync", "verify", "--dry-run"])
            .unwrap();
        let (name, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(name, "verify");
        assert!(sub_matches.get_flag("dry-run"));
    }

    #[test]
    fn test_help_text_reaches_the_rendered_cli() {
        let mut registry = CommandRegistry::new();
        registry.register(counting("verify").0);

        let mut cli = registry.build_cli();
        let help = cli.render_help().to_string();
        assert!(help.contains("verify"));
        assert!(help.contains("Counts how often it runs"));
    }
}
