//! The `sync` command: full synchronization across all registered
//! environments.
//!
//! Loads the migration catalog once, then synchronizes every environment
//! in registry order. Per-environment failures are logged and isolated;
//! the command itself fails only when nothing can run at all (catalog or
//! registry failure) or when every environment failed.

use std::path::PathBuf;

use async_trait::async_trait;

use sqlsync_core::{Settings, SyncError};
use sqlsync_db::EnvironmentRegistry;
use sqlsync_engine::{orchestrator, MigrationCatalog};

use crate::command::ManagementCommand;

/// Synchronizes all environments with the migration catalog.
pub struct SyncCommand;

#[async_trait]
impl ManagementCommand for SyncCommand {
    fn name(&self) -> &'static str {
        "sync"
    }

    fn help(&self) -> &'static str {
        "Apply new and drifted migrations to every environment"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("migrations-dir")
                .long("migrations-dir")
                .value_name("PATH")
                .help("Override the configured migration directory"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), SyncError> {
        let migrations_dir = matches
            .get_one::<String>("migrations-dir")
            .map_or_else(|| settings.migrations_dir.clone(), PathBuf::from);

        let catalog = MigrationCatalog::load(&migrations_dir)?;
        tracing::info!(
            dir = %migrations_dir.display(),
            migrations = catalog.len(),
            "catalog loaded"
        );

        // An empty catalog still visits every environment: the tracking
        // table is prepared unconditionally.
        let registry = EnvironmentRegistry::from_settings(&settings.environments)?;
        let report = orchestrator::sync(&catalog, &registry).await;
        registry.close();

        for outcome in &report.outcomes {
            if let Some(error) = &outcome.error {
                tracing::warn!(
                    environment = outcome.environment,
                    %error,
                    "environment failed"
                );
            } else {
                tracing::info!(
                    environment = outcome.environment,
                    applied = outcome.applied.len(),
                    reapplied = outcome.reapplied.len(),
                    skipped = outcome.skipped,
                    "environment ok"
                );
            }
        }

        match report.into_error_if_all_failed() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}
