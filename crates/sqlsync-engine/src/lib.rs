//! # sqlsync-engine
//!
//! The schema-migration synchronization engine. Applies a directory of
//! ordered SQL migration files to multiple named database environments,
//! tracks what has been applied via content checksums, detects drift (a
//! previously-applied migration whose file content changed), and re-applies
//! such migrations transactionally.
//!
//! ## Architecture
//!
//! - [`MigrationCatalog`] discovers and loads migration units from a
//!   directory; pure, side-effect-free.
//! - [`checksum`](checksum::checksum) is the deterministic content hash used
//!   for identity and drift detection.
//! - [`tracking`] is the per-environment durable record of applied
//!   migrations and their checksums.
//! - [`build_plan`](plan::build_plan) classifies every unit as new, changed,
//!   or unchanged against an environment's tracking state.
//! - [`applier`] executes one migration's content and its bookkeeping write
//!   as a single atomic unit.
//! - [`orchestrator`] drives the per-environment loop with failure
//!   isolation: one environment's failure never blocks another's sync.
//! - [`reporter`] is the independent read-only status path.
//!
//! ## Module Overview
//!
//! - [`catalog`] - `MigrationUnit`, `MigrationCatalog`
//! - [`checksum`](mod@checksum) - content hashing
//! - [`plan`] - `SyncAction`, `PlanEntry`, `build_plan`
//! - [`tracking`] - `AppliedMigration`, tracking-table access
//! - [`applier`] - transactional application of one unit
//! - [`orchestrator`] - `sync`, `SyncReport`, `EnvironmentOutcome`
//! - [`reporter`] - `status`, `EnvironmentStatus`

pub mod applier;
pub mod catalog;
pub mod checksum;
pub mod orchestrator;
pub mod plan;
pub mod reporter;
pub mod tracking;

// Re-export key types at the crate root.
pub use catalog::{MigrationCatalog, MigrationUnit};
pub use checksum::checksum;
pub use orchestrator::{sync, EnvironmentOutcome, SyncReport};
pub use plan::{build_plan, PlanEntry, SyncAction};
pub use reporter::{status, EnvironmentStatus, TableStatus};
pub use tracking::AppliedMigration;
