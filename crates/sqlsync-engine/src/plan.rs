//! Sync-plan computation: classifying catalog units against an
//! environment's tracking state.
//!
//! The plan is transient and recomputed every run. A unit is **new** when
//! the environment has no applied record for its name, **changed** when the
//! record's checksum differs from the unit's current checksum (drift), and
//! **unchanged** when the checksums match.

use std::collections::HashMap;

use crate::catalog::{MigrationCatalog, MigrationUnit};
use crate::tracking::AppliedMigration;

/// What the orchestrator must do with one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Never applied to this environment.
    New,
    /// Applied before, but the content has drifted; re-apply.
    Changed,
    /// Applied before with identical content; skip.
    Unchanged,
}

impl SyncAction {
    /// Returns `true` if the applier must run for this action.
    pub const fn requires_apply(self) -> bool {
        matches!(self, Self::New | Self::Changed)
    }
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::New => "new",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
        };
        f.write_str(label)
    }
}

/// One catalog unit paired with its current checksum and classification.
#[derive(Debug)]
pub struct PlanEntry<'a> {
    /// The catalog unit.
    pub unit: &'a MigrationUnit,
    /// The unit's current content checksum.
    pub checksum: String,
    /// The classification against the environment's tracking state.
    pub action: SyncAction,
}

/// Classifies every catalog unit, in catalog order, against the applied
/// records of one environment.
pub fn build_plan<'a>(
    catalog: &'a MigrationCatalog,
    applied: &HashMap<String, AppliedMigration>,
) -> Vec<PlanEntry<'a>> {
    catalog
        .iter()
        .map(|unit| {
            let checksum = unit.checksum();
            let action = match applied.get(&unit.name) {
                None => SyncAction::New,
                Some(record) if record.checksum == checksum => SyncAction::Unchanged,
                Some(_) => SyncAction::Changed,
            };
            PlanEntry {
                unit,
                checksum,
                action,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn catalog_of(units: &[(&str, &str)]) -> MigrationCatalog {
        // Catalogs are normally loaded from disk; build one through a temp
        // dir to keep the constructor private.
        use std::fs;
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let dir =
            std::env::temp_dir().join(format!("sqlsync_test_plan_{}_{}", std::process::id(), id));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        for (name, content) in units {
            fs::write(dir.join(format!("{name}.sql")), content).unwrap();
        }
        let catalog = MigrationCatalog::load(&dir).unwrap();
        let _ = fs::remove_dir_all(&dir);
        catalog
    }

    fn applied_record(name: &str, checksum: &str) -> AppliedMigration {
        AppliedMigration {
            migration_name: name.to_string(),
            checksum: checksum.to_string(),
            applied_at: Utc::now(),
        }
    }

    // ── Classification ──────────────────────────────────────────────

    #[test]
    fn test_all_new_on_fresh_environment() {
        let catalog = catalog_of(&[("001-a", "x"), ("002-b", "y")]);
        let plan = build_plan(&catalog, &HashMap::new());
        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|e| e.action == SyncAction::New));
    }

    #[test]
    fn test_unchanged_when_checksum_matches() {
        let catalog = catalog_of(&[("001-a", "x")]);
        let unit = catalog.get("001-a").unwrap();
        let mut applied = HashMap::new();
        applied.insert(
            unit.name.clone(),
            applied_record(&unit.name, &unit.checksum()),
        );

        let plan = build_plan(&catalog, &applied);
        assert_eq!(plan[0].action, SyncAction::Unchanged);
        assert!(!plan[0].action.requires_apply());
    }

    #[test]
    fn test_changed_on_checksum_drift() {
        let catalog = catalog_of(&[("001-a", "new content")]);
        let mut applied = HashMap::new();
        applied.insert(
            "001-a".to_string(),
            applied_record("001-a", &crate::checksum("old content".as_bytes())),
        );

        let plan = build_plan(&catalog, &applied);
        assert_eq!(plan[0].action, SyncAction::Changed);
        assert!(plan[0].action.requires_apply());
    }

    #[test]
    fn test_mixed_classification_preserves_catalog_order() {
        let catalog = catalog_of(&[("001-a", "a"), ("002-b", "b"), ("010-c", "c")]);
        let b = catalog.get("002-b").unwrap();
        let mut applied = HashMap::new();
        applied.insert(b.name.clone(), applied_record(&b.name, &b.checksum()));
        applied.insert(
            "010-c".to_string(),
            applied_record("010-c", "deadbeef"),
        );

        let plan = build_plan(&catalog, &applied);
        let summary: Vec<(&str, SyncAction)> = plan
            .iter()
            .map(|e| (e.unit.name.as_str(), e.action))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("001-a", SyncAction::New),
                ("002-b", SyncAction::Unchanged),
                ("010-c", SyncAction::Changed),
            ]
        );
    }

    #[test]
    fn test_second_run_is_all_unchanged() {
        // Simulates the idempotence property: a sync records every unit's
        // checksum, so an immediately repeated plan has nothing to do.
        let catalog = catalog_of(&[("001-a", "a"), ("002-b", "b")]);
        let applied: HashMap<String, AppliedMigration> = catalog
            .iter()
            .map(|u| (u.name.clone(), applied_record(&u.name, &u.checksum())))
            .collect();

        let plan = build_plan(&catalog, &applied);
        assert!(plan.iter().all(|e| e.action == SyncAction::Unchanged));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(SyncAction::New.to_string(), "new");
        assert_eq!(SyncAction::Changed.to_string(), "changed");
        assert_eq!(SyncAction::Unchanged.to_string(), "unchanged");
    }
}
