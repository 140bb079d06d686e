//! Logging integration for sqlsync.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for creating per-environment
//! spans so every event emitted while synchronizing an environment carries
//! its name.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level` (e.g. "debug", "info",
/// "sqlsync=debug"). In debug mode a pretty, human-readable format is used;
/// otherwise a structured JSON format is used. Installing over an existing
/// subscriber is a no-op, which keeps repeated calls in tests harmless.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for one environment's processing.
///
/// # Examples
///
/// ```
/// use sqlsync_core::logging::environment_span;
///
/// let span = environment_span("production");
/// let _guard = span.enter();
/// tracing::info!("synchronizing");
/// ```
pub fn environment_span(environment: &str) -> tracing::Span {
    tracing::info_span!("environment", name = environment)
}
