//! Settings loading from configuration files.
//!
//! This module loads [`Settings`] from a TOML file and applies
//! environment-variable overrides, so credentials never need to live on
//! disk.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML file (overriding defaults).
//! 3. Apply environment-variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `SQLSYNC_LOG_LEVEL` | `log_level` |
//! | `SQLSYNC_DEBUG` | `debug` ("1"/"true"/"0"/"false") |
//! | `SQLSYNC_MIGRATIONS_DIR` | `migrations_dir` |
//! | `SQLSYNC_PASSWORD_<NAME>` | password of the environment `<NAME>` (uppercased, non-alphanumerics as `_`) |

use std::path::Path;

use crate::error::{SyncError, SyncResult};
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML fall back to their defaults.
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] if the TOML is malformed.
pub fn from_toml_str(toml_str: &str) -> SyncResult<Settings> {
    toml::from_str(toml_str)
        .map_err(|e| SyncError::Configuration(format!("Failed to parse settings TOML: {e}")))
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] if the file cannot be read or the
/// TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> SyncResult<Settings> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        SyncError::Configuration(format!(
            "Failed to read settings file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings for a run: TOML file if present, defaults otherwise,
/// environment overrides on top.
///
/// A missing settings file is not an error; the tool is usable from
/// environment variables and defaults alone.
///
/// # Errors
///
/// Returns [`SyncError::Configuration`] if a settings file exists but cannot
/// be parsed.
pub fn load(path: impl AsRef<Path>) -> SyncResult<Settings> {
    let mut settings = if path.as_ref().exists() {
        from_toml_file(path)?
    } else {
        Settings::default()
    };
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Applies `SQLSYNC_*` environment-variable overrides to the settings.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(level) = std::env::var("SQLSYNC_LOG_LEVEL") {
        settings.log_level = level;
    }
    if let Ok(debug) = std::env::var("SQLSYNC_DEBUG") {
        settings.debug = matches!(debug.as_str(), "1" | "true" | "True" | "TRUE");
    }
    if let Ok(dir) = std::env::var("SQLSYNC_MIGRATIONS_DIR") {
        settings.migrations_dir = dir.into();
    }
    for env in &mut settings.environments {
        if let Ok(password) = std::env::var(format!("SQLSYNC_PASSWORD_{}", env_var_key(&env.name)))
        {
            env.password = password;
        }
    }
}

/// Maps an environment name to its env-var key fragment: uppercased, with
/// non-alphanumeric characters replaced by underscores.
fn env_var_key(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
