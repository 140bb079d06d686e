//! Environment registry over `deadpool-postgres` pools.
//!
//! Each configured environment name owns one connection pool built from its
//! connection descriptor. Pool construction is lazy-connect: building the
//! registry never performs a network round trip, and a broken environment
//! surfaces as [`SyncError::Connection`] at first use, not at registration
//! time.

use sqlsync_core::settings::{EnvironmentSettings, SslMode};
use sqlsync_core::{SyncError, SyncResult};

/// One independently addressed database target.
///
/// The environment owns its connection pool; the tracking table lives inside
/// this environment's database, so environment and tracking store are 1:1.
pub struct Environment {
    name: String,
    pool: deadpool_postgres::Pool,
}

impl Environment {
    /// Builds an environment from its connection descriptor.
    ///
    /// `prefer` and `require` modes get a system-trust-store TLS connector;
    /// `disable` skips TLS entirely.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Connection`] if the pool or TLS connector cannot
    /// be constructed (no connection is attempted here).
    pub fn from_settings(settings: &EnvironmentSettings) -> SyncResult<Self> {
        let mut config = deadpool_postgres::Config::new();
        config.host = Some(settings.host.clone());
        config.port = Some(settings.port);
        config.dbname = Some(settings.dbname.clone());
        config.user = Some(settings.user.clone());
        config.password = Some(settings.password.clone());
        config.ssl_mode = Some(match settings.ssl_mode {
            SslMode::Disable => deadpool_postgres::SslMode::Disable,
            SslMode::Prefer => deadpool_postgres::SslMode::Prefer,
            SslMode::Require => deadpool_postgres::SslMode::Require,
        });

        let runtime = Some(deadpool_postgres::Runtime::Tokio1);
        let pool = match settings.ssl_mode {
            SslMode::Disable => config.create_pool(runtime, tokio_postgres::NoTls),
            SslMode::Prefer | SslMode::Require => {
                let connector =
                    native_tls::TlsConnector::new().map_err(|e| SyncError::Connection {
                        environment: settings.name.clone(),
                        message: format!("cannot build TLS connector: {e}"),
                    })?;
                config.create_pool(
                    runtime,
                    postgres_native_tls::MakeTlsConnector::new(connector),
                )
            }
        }
        .map_err(|e| SyncError::Connection {
            environment: settings.name.clone(),
            message: format!("failed to create pool: {e}"),
        })?;

        Ok(Self {
            name: settings.name.clone(),
            pool,
        })
    }

    /// Returns the environment's registry name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Checks out a pooled client.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Connection`] if the pool cannot reach the
    /// database.
    pub async fn client(&self) -> SyncResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(|e| SyncError::Connection {
            environment: self.name.clone(),
            message: format!("pool error: {e}"),
        })
    }

    /// Releases the environment's pool. Safe to call on a pool that never
    /// connected successfully.
    pub fn close(&self) {
        self.pool.close();
    }
}

impl std::fmt::Debug for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// The named database targets, in configuration order.
///
/// The registry exclusively owns all pool resources. [`close`](Self::close)
/// releases every pool and is safe regardless of individual pool health.
#[derive(Debug, Default)]
pub struct EnvironmentRegistry {
    environments: Vec<Environment>,
}

impl EnvironmentRegistry {
    /// Builds the registry from the configured environments.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Configuration`] if no environments are
    /// configured, an environment has an empty name, or two environments
    /// share a name; [`SyncError::Connection`] if a pool cannot be built.
    pub fn from_settings(settings: &[EnvironmentSettings]) -> SyncResult<Self> {
        if settings.is_empty() {
            return Err(SyncError::Configuration(
                "no environments configured".to_string(),
            ));
        }

        let mut environments = Vec::with_capacity(settings.len());
        for env_settings in settings {
            if env_settings.name.is_empty() {
                return Err(SyncError::Configuration(
                    "environment with empty name".to_string(),
                ));
            }
            if environments
                .iter()
                .any(|e: &Environment| e.name() == env_settings.name)
            {
                return Err(SyncError::Configuration(format!(
                    "duplicate environment name '{}'",
                    env_settings.name
                )));
            }
            tracing::debug!(environment = env_settings.name, "registering environment");
            environments.push(Environment::from_settings(env_settings)?);
        }

        Ok(Self { environments })
    }

    /// Returns the environment registered under `name`, if any.
    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name() == name)
    }

    /// Iterates the environments in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.environments.iter()
    }

    /// Returns the number of registered environments.
    pub fn len(&self) -> usize {
        self.environments.len()
    }

    /// Returns `true` if no environments are registered.
    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// Releases every environment's pool.
    pub fn close(&self) {
        for env in &self.environments {
            env.close();
        }
    }
}

impl<'a> IntoIterator for &'a EnvironmentRegistry {
    type Item = &'a Environment;
    type IntoIter = std::slice::Iter<'a, Environment>;

    fn into_iter(self) -> Self::IntoIter {
        self.environments.iter()
    }
}
