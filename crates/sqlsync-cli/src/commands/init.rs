//! The `init` command: create tracking tables only, apply nothing.
//!
//! Useful when provisioning a new environment: the tracking table exists
//! afterwards, so a later `sync` starts from a readable (empty) ledger.
//! Follows the same failure-isolation contract as `sync`: one unreachable
//! environment does not block the others, and the command fails only when
//! every environment failed.

use async_trait::async_trait;

use sqlsync_core::{Settings, SyncError};
use sqlsync_db::EnvironmentRegistry;
use sqlsync_engine::tracking;

use crate::command::ManagementCommand;

/// Creates the tracking table in every environment.
pub struct InitCommand;

#[async_trait]
impl ManagementCommand for InitCommand {
    fn name(&self) -> &'static str {
        "init"
    }

    fn help(&self) -> &'static str {
        "Create the migration tracking table in every environment"
    }

    async fn handle(
        &self,
        _matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), SyncError> {
        let registry = EnvironmentRegistry::from_settings(&settings.environments)?;

        let mut first_error = None;
        let mut failures = 0;
        for env in &registry {
            match tracking::ensure_schema(env).await {
                Ok(()) => {
                    tracing::info!(environment = env.name(), "tracking table ready");
                }
                Err(error) => {
                    tracing::error!(environment = env.name(), %error, "init failed");
                    failures += 1;
                    first_error.get_or_insert(error);
                }
            }
        }
        registry.close();

        match first_error {
            Some(error) if failures == registry.len() => Err(error),
            _ => Ok(()),
        }
    }
}
