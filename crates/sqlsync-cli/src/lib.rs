//! # sqlsync-cli
//!
//! Command-line interface for sqlsync. The binary exposes three verbs:
//!
//! - `sync` (the default) — full synchronization across all registered
//!   environments
//! - `status` — read-only report of connectivity and schema state
//! - `init` — create tracking tables only, apply nothing
//!
//! ## Modules
//!
//! - [`command`] - `ManagementCommand` trait and `CommandRegistry`
//! - [`commands`] - the built-in verbs

pub mod command;
pub mod commands;

pub use command::{CommandRegistry, ManagementCommand};

/// Builds the registry holding the built-in verbs.
pub fn default_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry.register(Box::new(commands::SyncCommand));
    registry.register(Box::new(commands::StatusCommand));
    registry.register(Box::new(commands::InitCommand));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_holds_the_three_verbs() {
        let registry = default_registry();
        assert_eq!(registry.list_commands(), vec!["init", "status", "sync"]);
    }
}
