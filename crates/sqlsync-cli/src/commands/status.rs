//! The `status` command: read-only inspection of every environment.
//!
//! Reports connectivity, applied-migration counts, key-table presence, and
//! the primary entity table's row count. Never mutates anything; broken
//! sub-checks show up as "unknown" rather than failing the report.

use async_trait::async_trait;

use sqlsync_core::{Settings, SyncError};
use sqlsync_db::EnvironmentRegistry;
use sqlsync_engine::reporter;

use crate::command::ManagementCommand;

/// Prints a per-environment status report.
pub struct StatusCommand;

#[async_trait]
impl ManagementCommand for StatusCommand {
    fn name(&self) -> &'static str {
        "status"
    }

    fn help(&self) -> &'static str {
        "Report connectivity and schema state of every environment"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(
            clap::Arg::new("json")
                .long("json")
                .action(clap::ArgAction::SetTrue)
                .help("Emit the report as JSON on stdout"),
        )
    }

    async fn handle(
        &self,
        matches: &clap::ArgMatches,
        settings: &Settings,
    ) -> Result<(), SyncError> {
        let registry = EnvironmentRegistry::from_settings(&settings.environments)?;
        let reports = reporter::status(&registry, &settings.status).await;
        registry.close();

        if matches.get_flag("json") {
            let json = serde_json::to_string_pretty(&reports).map_err(|e| {
                SyncError::Configuration(format!("cannot serialize status report: {e}"))
            })?;
            println!("{json}");
            return Ok(());
        }

        for report in &reports {
            println!("environment: {}", report.environment);
            println!("  reachable:  {}", report.reachable);
            println!("  migrations: {}", render_count(report.applied_migrations));
            for table in &report.key_tables {
                let present = match table.present {
                    Some(true) => "present",
                    Some(false) => "absent",
                    None => "unknown",
                };
                println!("  table {:<24} {present}", table.name);
            }
            println!(
                "  {} rows:  {}",
                settings.status.primary_table,
                render_count(report.primary_rows)
            );
        }
        Ok(())
    }
}

fn render_count(count: Option<i64>) -> String {
    count.map_or_else(|| "unknown".to_string(), |n| n.to_string())
}
