//! Migration source catalog: filesystem discovery of ordered migration
//! units.
//!
//! The catalog scans a directory non-recursively for files named with a
//! three-digit ordinal prefix, a dash, a descriptive slug, and a `.sql`
//! extension (e.g. `012-add-bonus-column.sql`), and returns them sorted
//! lexicographically by file name — which, by the ordinal-prefix convention,
//! is execution order. Content is read verbatim; the catalog never
//! interprets SQL.

use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use sqlsync_core::{SyncError, SyncResult};

use crate::checksum;

static MIGRATION_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}-[A-Za-z0-9][A-Za-z0-9._-]*\.sql$").expect("valid regex"));

/// One named, ordered, opaque block of schema-change content.
///
/// Constructed by the catalog at load time and read-only thereafter. The
/// checksum is derived from the content on demand, never cached across
/// process runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationUnit {
    /// Identity, derived from the file name (without extension). Unique
    /// within a catalog and sortable by the ordinal-prefix convention.
    pub name: String,
    /// Opaque executable SQL text, loaded once per run.
    pub content: String,
}

impl MigrationUnit {
    /// Computes this unit's content checksum.
    pub fn checksum(&self) -> String {
        checksum::checksum(self.content.as_bytes())
    }
}

/// A finite, ordered sequence of migration units.
#[derive(Debug, Clone, Default)]
pub struct MigrationCatalog {
    units: Vec<MigrationUnit>,
}

impl MigrationCatalog {
    /// Loads all migration units from `dir`.
    ///
    /// Entries that are not regular files or whose names do not match the
    /// migration pattern are skipped. The returned catalog is sorted by
    /// unit name.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Catalog`] if the directory or any matching file
    /// cannot be read.
    pub fn load(dir: impl AsRef<Path>) -> SyncResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|e| {
            SyncError::Catalog(format!(
                "cannot read migration directory '{}': {e}",
                dir.display()
            ))
        })?;

        let mut units = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SyncError::Catalog(format!("cannot read directory entry: {e}"))
            })?;
            let path = entry.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !path.is_file() || !MIGRATION_FILE.is_match(file_name) {
                tracing::debug!(entry = file_name, "skipping non-migration entry");
                continue;
            }

            let content = std::fs::read_to_string(&path).map_err(|e| {
                SyncError::Catalog(format!(
                    "cannot read migration file '{}': {e}",
                    path.display()
                ))
            })?;
            let name = path
                .file_stem()
                .and_then(|n| n.to_str())
                .unwrap_or(file_name)
                .to_string();
            units.push(MigrationUnit { name, content });
        }

        // Lexicographic order equals execution order under the fixed-width
        // ordinal prefix.
        units.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { units })
    }

    /// Iterates the units in execution order.
    pub fn iter(&self) -> impl Iterator<Item = &MigrationUnit> {
        self.units.iter()
    }

    /// Returns the unit with the given name, if present.
    pub fn get(&self, name: &str) -> Option<&MigrationUnit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Returns the number of units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Returns `true` if the catalog holds no units.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<'a> IntoIterator for &'a MigrationCatalog {
    type Item = &'a MigrationUnit;
    type IntoIter = std::slice::Iter<'a, MigrationUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.iter()
    }
}
