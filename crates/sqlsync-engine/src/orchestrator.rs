//! Synchronization orchestrator.
//!
//! Drives the per-environment loop: ensure the tracking schema, list
//! applied records, classify every catalog unit, and apply everything that
//! is new or changed, sequentially and in catalog order. A migration
//! failure aborts the remaining migrations for that environment — later
//! units may assume the failed unit's schema changes exist — but never
//! stops the other environments. That asymmetry is the orchestrator's core
//! failure-isolation contract.

use tracing::Instrument;

use sqlsync_core::logging::environment_span;
use sqlsync_core::SyncError;
use sqlsync_db::{Environment, EnvironmentRegistry};

use crate::applier;
use crate::catalog::MigrationCatalog;
use crate::plan::{build_plan, SyncAction};
use crate::tracking;

/// The result of synchronizing one environment.
#[derive(Debug, Default)]
pub struct EnvironmentOutcome {
    /// The environment name.
    pub environment: String,
    /// Names of units applied for the first time.
    pub applied: Vec<String>,
    /// Names of drifted units that were re-applied.
    pub reapplied: Vec<String>,
    /// Count of unchanged units skipped.
    pub skipped: usize,
    /// The error that aborted this environment's sync, if any.
    pub error: Option<SyncError>,
}

impl EnvironmentOutcome {
    fn new(environment: &str) -> Self {
        Self {
            environment: environment.to_string(),
            ..Self::default()
        }
    }

    /// Returns `true` if this environment synchronized without error.
    pub const fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// The result of one full synchronization run.
#[derive(Debug, Default)]
pub struct SyncReport {
    /// Per-environment outcomes, in registry order.
    pub outcomes: Vec<EnvironmentOutcome>,
}

impl SyncReport {
    /// Returns `true` if at least one environment failed.
    pub fn any_failed(&self) -> bool {
        self.outcomes.iter().any(|o| !o.succeeded())
    }

    /// Returns `true` if every environment failed (the run achieved
    /// nothing).
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(|o| !o.succeeded())
    }

    /// Consumes the report, returning the first environment error if every
    /// environment failed.
    pub fn into_error_if_all_failed(self) -> Option<SyncError> {
        if self.all_failed() {
            self.outcomes.into_iter().find_map(|o| o.error)
        } else {
            None
        }
    }
}

/// Synchronizes every registered environment with the catalog.
///
/// Environments are processed sequentially in registry order; each owns
/// disjoint state, so one environment's failure is recorded in its outcome
/// and the run moves on. Progress is logged as it happens.
pub async fn sync(catalog: &MigrationCatalog, registry: &EnvironmentRegistry) -> SyncReport {
    let mut report = SyncReport::default();
    for env in registry {
        let outcome = sync_environment(catalog, env)
            .instrument(environment_span(env.name()))
            .await;
        report.outcomes.push(outcome);
    }
    report
}

async fn sync_environment(catalog: &MigrationCatalog, env: &Environment) -> EnvironmentOutcome {
    let mut outcome = EnvironmentOutcome::new(env.name());

    if let Err(e) = tracking::ensure_schema(env).await {
        tracing::error!(error = %e, "cannot prepare tracking table; skipping environment");
        outcome.error = Some(e);
        return outcome;
    }

    let applied = match tracking::list_applied(env).await {
        Ok(applied) => applied,
        Err(e) => {
            tracing::error!(error = %e, "cannot read tracking state; skipping environment");
            outcome.error = Some(e);
            return outcome;
        }
    };

    for entry in build_plan(catalog, &applied) {
        match entry.action {
            SyncAction::Unchanged => {
                tracing::debug!(migration = %entry.unit.name, "unchanged; skipping");
                outcome.skipped += 1;
            }
            SyncAction::New | SyncAction::Changed => {
                tracing::info!(
                    migration = %entry.unit.name,
                    action = %entry.action,
                    "applying migration"
                );
                match applier::apply(env, entry.unit, &entry.checksum).await {
                    Ok(()) => {
                        if entry.action == SyncAction::Changed {
                            outcome.reapplied.push(entry.unit.name.clone());
                        } else {
                            outcome.applied.push(entry.unit.name.clone());
                        }
                    }
                    Err(e) => {
                        // Later units may depend on this one's schema;
                        // nothing further can safely run here.
                        tracing::error!(
                            migration = %entry.unit.name,
                            error = %e,
                            "migration failed; aborting remaining migrations for this environment"
                        );
                        outcome.error = Some(e);
                        return outcome;
                    }
                }
            }
        }
    }

    tracing::info!(
        applied = outcome.applied.len(),
        reapplied = outcome.reapplied.len(),
        skipped = outcome.skipped,
        "environment synchronized"
    );
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(name: &str) -> EnvironmentOutcome {
        EnvironmentOutcome {
            environment: name.to_string(),
            error: Some(SyncError::Connection {
                environment: name.to_string(),
                message: "refused".into(),
            }),
            ..EnvironmentOutcome::default()
        }
    }

    fn succeeded(name: &str) -> EnvironmentOutcome {
        EnvironmentOutcome::new(name)
    }

    // ── SyncReport ──────────────────────────────────────────────────

    #[test]
    fn test_report_empty_never_all_failed() {
        let report = SyncReport::default();
        assert!(!report.any_failed());
        assert!(!report.all_failed());
    }

    #[test]
    fn test_report_partial_failure_is_not_all_failed() {
        let report = SyncReport {
            outcomes: vec![failed("a"), succeeded("b")],
        };
        assert!(report.any_failed());
        assert!(!report.all_failed());
        assert!(report.into_error_if_all_failed().is_none());
    }

    #[test]
    fn test_report_all_failed() {
        let report = SyncReport {
            outcomes: vec![failed("a"), failed("b")],
        };
        assert!(report.all_failed());
        let err = report.into_error_if_all_failed().unwrap();
        assert_eq!(err.environment(), Some("a"));
    }

    // ── Failure isolation ───────────────────────────────────────────

    #[tokio::test]
    async fn test_sync_records_an_outcome_per_environment() {
        use sqlsync_core::settings::EnvironmentSettings;

        // Two unreachable environments: the first one's connection failure
        // must not prevent the second from being attempted.
        let mk = |name: &str| EnvironmentSettings {
            name: name.to_string(),
            host: "127.0.0.1".to_string(),
            port: 1,
            ..EnvironmentSettings::default()
        };
        let registry = EnvironmentRegistry::from_settings(&[mk("a"), mk("b")]).unwrap();
        let catalog = MigrationCatalog::default();

        let report = sync(&catalog, &registry).await;
        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.outcomes[0].environment, "a");
        assert_eq!(report.outcomes[1].environment, "b");
        assert!(report.all_failed());
        for outcome in &report.outcomes {
            assert!(matches!(
                outcome.error,
                Some(SyncError::Connection { .. })
            ));
        }
    }
}
