//! Core error types for sqlsync.
//!
//! This module provides the [`SyncError`] enum covering every failure class
//! the synchronization engine can hit: catalog loading, environment
//! connectivity, tracking-table access, migration execution, and
//! configuration. Each variant carries enough context (environment name,
//! migration name, underlying cause) for operator diagnosis.

use thiserror::Error;

/// The primary error type for sqlsync.
///
/// The variants map to the blast radius of the failure:
///
/// - [`Catalog`](Self::Catalog) and [`Configuration`](Self::Configuration)
///   are fatal to the whole run, since no plan can be computed without a
///   readable catalog and a valid environment registry.
/// - [`Connection`](Self::Connection), [`Tracking`](Self::Tracking), and
///   [`MigrationExecution`](Self::MigrationExecution) are fatal to one
///   environment only; synchronization continues on the remaining
///   environments.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The migration directory could not be read, or a migration file in it
    /// could not be loaded.
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// An environment's connection pool could not reach its database.
    #[error("Connection error for environment '{environment}': {message}")]
    Connection {
        /// The environment whose pool failed.
        environment: String,
        /// The underlying cause.
        message: String,
    },

    /// The tracking table could not be read or written.
    #[error("Tracking error for environment '{environment}': {message}")]
    Tracking {
        /// The environment whose tracking table failed.
        environment: String,
        /// The underlying cause.
        message: String,
    },

    /// A migration's own content failed to execute.
    #[error("Migration '{migration}' failed on environment '{environment}': {message}")]
    MigrationExecution {
        /// The environment the migration was being applied to.
        environment: String,
        /// The migration unit name.
        migration: String,
        /// The underlying cause.
        message: String,
    },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SyncError {
    /// Returns the environment this error is scoped to, if any.
    ///
    /// Run-fatal errors (catalog, configuration, IO) return `None`.
    pub fn environment(&self) -> Option<&str> {
        match self {
            Self::Connection { environment, .. }
            | Self::Tracking { environment, .. }
            | Self::MigrationExecution { environment, .. } => Some(environment),
            Self::Catalog(_) | Self::Configuration(_) | Self::Io(_) => None,
        }
    }

    /// Returns `true` if this error aborts only one environment's sync,
    /// leaving the remaining environments free to proceed.
    pub const fn is_environment_scoped(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::Tracking { .. } | Self::MigrationExecution { .. }
        )
    }
}

/// A convenience type alias for `Result<T, SyncError>`.
pub type SyncResult<T> = Result<T, SyncError>;
