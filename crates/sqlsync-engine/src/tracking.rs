//! Per-environment tracking store for applied migrations.
//!
//! The store is one table, `schema_migrations`, living inside each
//! environment's own database: a durable ledger of which migrations have
//! been applied there and with what checksum. Records are never deleted by
//! this subsystem; re-applying a drifted migration upserts the row,
//! refreshing its checksum and timestamp.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use sqlsync_core::{SyncError, SyncResult};
use sqlsync_db::Environment;

/// The tracking table name.
pub const TRACKING_TABLE: &str = "schema_migrations";

/// One applied-migration record.
///
/// Invariant: at most one record per `migration_name` per environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMigration {
    /// The migration unit name.
    pub migration_name: String,
    /// The content checksum at the time of the last successful application.
    pub checksum: String,
    /// When the migration was last successfully applied.
    pub applied_at: DateTime<Utc>,
}

/// DDL that idempotently creates the tracking table.
pub const fn ensure_schema_sql() -> &'static str {
    "CREATE TABLE IF NOT EXISTS \"schema_migrations\" (\
        \"id\" BIGSERIAL PRIMARY KEY, \
        \"migration_name\" VARCHAR(255) NOT NULL UNIQUE, \
        \"applied_at\" TIMESTAMPTZ NOT NULL DEFAULT NOW(), \
        \"checksum\" VARCHAR(64) NOT NULL\
    )"
}

/// Query returning every applied-migration record.
pub const fn list_applied_sql() -> &'static str {
    "SELECT \"migration_name\", \"checksum\", \"applied_at\" FROM \"schema_migrations\""
}

/// Insert-or-update by `migration_name`: `$1` = name, `$2` = checksum.
///
/// The upsert keeps exactly one record per name and refreshes `applied_at`
/// on re-application.
pub const fn record_applied_sql() -> &'static str {
    "INSERT INTO \"schema_migrations\" (\"migration_name\", \"checksum\", \"applied_at\") \
     VALUES ($1, $2, NOW()) \
     ON CONFLICT (\"migration_name\") DO UPDATE \
     SET \"checksum\" = EXCLUDED.\"checksum\", \"applied_at\" = NOW()"
}

/// Idempotently creates the tracking table in `env`'s database.
///
/// # Errors
///
/// Returns [`SyncError::Connection`] if the environment is unreachable, or
/// [`SyncError::Tracking`] if the DDL fails.
pub async fn ensure_schema(env: &Environment) -> SyncResult<()> {
    let client = env.client().await?;
    client
        .batch_execute(ensure_schema_sql())
        .await
        .map_err(|e| SyncError::Tracking {
            environment: env.name().to_string(),
            message: format!("cannot create tracking table: {e}"),
        })
}

/// Loads every applied-migration record of `env`, keyed by migration name.
///
/// # Errors
///
/// Returns [`SyncError::Connection`] if the environment is unreachable, or
/// [`SyncError::Tracking`] if the table cannot be read.
pub async fn list_applied(env: &Environment) -> SyncResult<HashMap<String, AppliedMigration>> {
    let client = env.client().await?;
    let rows = client
        .query(list_applied_sql(), &[])
        .await
        .map_err(|e| SyncError::Tracking {
            environment: env.name().to_string(),
            message: format!("cannot read tracking table: {e}"),
        })?;

    let mut applied = HashMap::with_capacity(rows.len());
    for row in rows {
        let record = AppliedMigration {
            migration_name: row.try_get("migration_name").map_err(|e| tracking_row_error(env, &e))?,
            checksum: row.try_get("checksum").map_err(|e| tracking_row_error(env, &e))?,
            applied_at: row.try_get("applied_at").map_err(|e| tracking_row_error(env, &e))?,
        };
        applied.insert(record.migration_name.clone(), record);
    }
    Ok(applied)
}

/// Upserts an applied-migration record on an open transaction.
///
/// Must run on the same transaction as the migration's content execution so
/// the bookkeeping write shares the migration's atomicity.
///
/// # Errors
///
/// Returns [`SyncError::Tracking`] on any data-access failure; the caller's
/// transaction rollback covers it.
pub async fn record_applied(
    tx: &tokio_postgres::Transaction<'_>,
    environment: &str,
    migration_name: &str,
    checksum: &str,
) -> SyncResult<()> {
    tx.execute(record_applied_sql(), &[&migration_name, &checksum])
        .await
        .map(|_| ())
        .map_err(|e| SyncError::Tracking {
            environment: environment.to_string(),
            message: format!("cannot record migration '{migration_name}': {e}"),
        })
}

fn tracking_row_error(env: &Environment, cause: &tokio_postgres::Error) -> SyncError {
    SyncError::Tracking {
        environment: env.name().to_string(),
        message: format!("malformed tracking row: {cause}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── SQL text ────────────────────────────────────────────────────

    #[test]
    fn test_ensure_schema_sql_is_idempotent_ddl() {
        let sql = ensure_schema_sql();
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS"));
        assert!(sql.contains(TRACKING_TABLE));
        assert!(sql.contains("UNIQUE"));
        assert!(sql.contains("DEFAULT NOW()"));
    }

    #[test]
    fn test_record_applied_sql_is_upsert() {
        let sql = record_applied_sql();
        assert!(sql.contains("INSERT INTO"));
        assert!(sql.contains("ON CONFLICT (\"migration_name\") DO UPDATE"));
        assert!(sql.contains("$1"));
        assert!(sql.contains("$2"));
        assert!(sql.contains("\"applied_at\" = NOW()"));
    }

    #[test]
    fn test_list_applied_sql_selects_all_columns() {
        let sql = list_applied_sql();
        assert!(sql.contains("migration_name"));
        assert!(sql.contains("checksum"));
        assert!(sql.contains("applied_at"));
    }

    // ── Records ─────────────────────────────────────────────────────

    #[test]
    fn test_applied_migration_equality_ignores_nothing() {
        let at = Utc::now();
        let a = AppliedMigration {
            migration_name: "001-a".into(),
            checksum: "abc".into(),
            applied_at: at,
        };
        let b = a.clone();
        assert_eq!(a, b);
    }
}
