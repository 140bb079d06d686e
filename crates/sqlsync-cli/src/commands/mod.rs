//! Built-in sqlsync verbs.

pub mod init;
pub mod status;
pub mod sync;

pub use init::InitCommand;
pub use status::StatusCommand;
pub use sync::SyncCommand;
