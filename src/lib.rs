//! switchback - bulk running-config backup for switch fleets over SSH
//!
//! Core library exposing the backup workflow and the session traits it runs
//! against.

// Public modules
pub mod config;
pub mod constants;
pub mod core;
pub mod logger;
pub mod models;
pub mod platform;
pub mod utils;
pub mod workspace;

// Re-export commonly used types
pub use core::{run_backup, run_backup_at, DeviceSession, RunConfig, RunSummary, SessionOpener};
pub use models::{Credentials, DeviceType, SecureString, Username};
pub use utils::{ConfigError, DeviceError, FatalError, SessionError, WorkspaceError};
