//! Read-only status reporting over the environment registry.
//!
//! The reporter never mutates tracking state and never aborts: every
//! sub-check (connectivity, applied-migration count, key-table presence,
//! primary-table row count) degrades independently to "unknown" (`None`)
//! when it fails, so a half-broken environment still yields a useful
//! partial report.

use serde::Serialize;

use sqlsync_core::settings::StatusSettings;
use sqlsync_db::{Environment, EnvironmentRegistry};

use crate::tracking;

/// Presence of one key table in an environment.
#[derive(Debug, Clone, Serialize)]
pub struct TableStatus {
    /// The table name.
    pub name: String,
    /// `Some(true)` if present, `Some(false)` if absent, `None` if the
    /// check could not run.
    pub present: Option<bool>,
}

/// The status report for one environment.
#[derive(Debug, Serialize)]
pub struct EnvironmentStatus {
    /// The environment name.
    pub environment: String,
    /// Whether a round trip to the database succeeded.
    pub reachable: bool,
    /// Number of applied-migration records, if readable.
    pub applied_migrations: Option<i64>,
    /// Per-table presence of the configured key tables.
    pub key_tables: Vec<TableStatus>,
    /// Row count of the configured primary entity table, if readable.
    pub primary_rows: Option<i64>,
}

impl EnvironmentStatus {
    fn unknown(env: &Environment, checks: &StatusSettings) -> Self {
        Self {
            environment: env.name().to_string(),
            reachable: false,
            applied_migrations: None,
            key_tables: checks
                .key_tables
                .iter()
                .map(|name| TableStatus {
                    name: name.clone(),
                    present: None,
                })
                .collect(),
            primary_rows: None,
        }
    }
}

/// Produces a status report for every registered environment.
pub async fn status(
    registry: &EnvironmentRegistry,
    checks: &StatusSettings,
) -> Vec<EnvironmentStatus> {
    let mut reports = Vec::with_capacity(registry.len());
    for env in registry {
        reports.push(environment_status(env, checks).await);
    }
    reports
}

async fn environment_status(env: &Environment, checks: &StatusSettings) -> EnvironmentStatus {
    let mut report = EnvironmentStatus::unknown(env, checks);

    let client = match env.client().await {
        Ok(client) => client,
        Err(e) => {
            tracing::warn!(environment = env.name(), error = %e, "environment unreachable");
            return report;
        }
    };

    report.reachable = client.query_one("SELECT 1", &[]).await.is_ok();
    if !report.reachable {
        return report;
    }

    report.applied_migrations = client
        .query_one(
            &format!("SELECT COUNT(*) FROM \"{}\"", tracking::TRACKING_TABLE),
            &[],
        )
        .await
        .ok()
        .and_then(|row| row.try_get(0).ok());

    for table in &mut report.key_tables {
        report_table_presence(&client, table).await;
    }

    report.primary_rows = client
        .query_one(
            &format!(
                "SELECT COUNT(*) FROM \"{}\"",
                checks.primary_table.replace('"', "\"\"")
            ),
            &[],
        )
        .await
        .ok()
        .and_then(|row| row.try_get(0).ok());

    report
}

async fn report_table_presence(client: &deadpool_postgres::Object, table: &mut TableStatus) {
    table.present = client
        .query_one("SELECT to_regclass($1) IS NOT NULL", &[&table.name])
        .await
        .ok()
        .and_then(|row| row.try_get(0).ok());
}
