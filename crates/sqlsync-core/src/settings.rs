//! Settings for sqlsync.
//!
//! This module provides the [`Settings`] struct holding the migration
//! directory, the named environment registry configuration, and the checks
//! performed by the status report. Every field has a sensible default so a
//! partial settings file (or no file at all) still yields a usable
//! configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Transport-security mode for an environment's connections.
///
/// Maps onto the PostgreSQL `sslmode` connection parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    /// Never use TLS.
    #[default]
    Disable,
    /// Use TLS when the server supports it.
    Prefer,
    /// Refuse to connect without TLS.
    Require,
}

/// Connection descriptor for one named database environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    /// The registry key, e.g. "development" or "production".
    pub name: String,
    /// The database host.
    pub host: String,
    /// The database port.
    pub port: u16,
    /// The database name.
    pub dbname: String,
    /// The database user.
    pub user: String,
    /// The database password.
    pub password: String,
    /// Transport-security mode.
    pub ssl_mode: SslMode,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            host: "localhost".to_string(),
            port: 5432,
            dbname: "postgres".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            ssl_mode: SslMode::Disable,
        }
    }
}

/// Configuration for the read-only status report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSettings {
    /// Tables whose presence is checked per environment.
    pub key_tables: Vec<String>,
    /// The primary entity table whose row count is reported.
    pub primary_table: String,
}

impl Default for StatusSettings {
    fn default() -> Self {
        Self {
            key_tables: vec![
                "users".to_string(),
                "api_keys".to_string(),
                "usage_events".to_string(),
                "referrals".to_string(),
            ],
            primary_table: "users".to_string(),
        }
    }
}

/// The complete tool configuration.
///
/// # Examples
///
/// ```
/// use sqlsync_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.log_level, "info");
/// assert!(settings.environments.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether debug mode is enabled (pretty log output instead of JSON).
    pub debug: bool,
    /// The tracing filter directive, e.g. "info" or "sqlsync=debug".
    pub log_level: String,
    /// Directory containing the ordered migration files.
    pub migrations_dir: PathBuf,
    /// The named database environments, in synchronization order.
    pub environments: Vec<EnvironmentSettings>,
    /// Status-report checks.
    pub status: StatusSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            migrations_dir: PathBuf::from("migrations"),
            environments: Vec::new(),
            status: StatusSettings::default(),
        }
    }
}
