//! # sqlsync-db
//!
//! Named database environments for sqlsync, each backed by its own
//! `deadpool-postgres` connection pool. The registry exclusively owns every
//! pool: opened at construction, released at shutdown.
//!
//! ## Modules
//!
//! - [`registry`] - `Environment` and `EnvironmentRegistry`

pub mod registry;

pub use registry::{Environment, EnvironmentRegistry};
