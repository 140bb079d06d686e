//! Transactional application of one migration unit to one environment.
//!
//! The migration's content and its tracking upsert run as a single atomic
//! unit: begin transaction, execute content, record, commit. Any failure
//! rolls the transaction back (transaction drop), leaving neither the
//! schema change nor the tracking record behind. Failures are never retried
//! here — a failing migration is a data or schema problem for a human, not
//! a transient fault.

use sqlsync_core::{SyncError, SyncResult};
use sqlsync_db::Environment;

use crate::catalog::MigrationUnit;
use crate::tracking;

/// Applies `unit` to `env` atomically, recording `checksum` in the tracking
/// table on success.
///
/// # Errors
///
/// - [`SyncError::Connection`] if no client can be checked out.
/// - [`SyncError::MigrationExecution`] if the transaction cannot be opened
///   or committed, or the unit's content fails.
/// - [`SyncError::Tracking`] if the bookkeeping write fails.
pub async fn apply(env: &Environment, unit: &MigrationUnit, checksum: &str) -> SyncResult<()> {
    let mut client = env.client().await?;
    let tx = client
        .transaction()
        .await
        .map_err(|e| execution_error(env, unit, format!("cannot begin transaction: {e}")))?;

    tx.batch_execute(&unit.content)
        .await
        .map_err(|e| execution_error(env, unit, e.to_string()))?;

    tracking::record_applied(&tx, env.name(), &unit.name, checksum).await?;

    tx.commit()
        .await
        .map_err(|e| execution_error(env, unit, format!("commit failed: {e}")))
}

fn execution_error(env: &Environment, unit: &MigrationUnit, message: String) -> SyncError {
    SyncError::MigrationExecution {
        environment: env.name().to_string(),
        migration: unit.name.clone(),
        message,
    }
}
