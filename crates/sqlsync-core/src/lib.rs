//! # sqlsync-core
//!
//! Error taxonomy, settings model, settings loading, and logging setup for
//! sqlsync. This crate has no database dependencies and provides the
//! foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result alias
//! - [`settings`] - Tool settings and environment connection descriptors
//! - [`settings_loader`] - TOML loading with environment-variable overrides
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{SyncError, SyncResult};
pub use settings::{EnvironmentSettings, Settings, SslMode, StatusSettings};
