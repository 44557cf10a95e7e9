//! Error types for switchback
//!
//! All error types use thiserror for clean error handling.
//! SECURITY: Error messages MUST NOT contain passwords or sensitive data.

use std::path::PathBuf;
use std::time::Duration;

/// Fatal pre-flight errors: either of these aborts the run before any
/// device is contacted.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

/// Errors from loading the credential file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read credential file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot parse credential file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("credential field '{0}' must not be empty")]
    EmptyField(&'static str),

    #[error("invalid username: {0}")]
    InvalidUsername(String),
}

/// Errors from preparing the run's backup directory
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    #[error("cannot create backup directory {path}: {source}")]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Errors from remote session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("authentication failed")]
    Authentication,

    #[error("privilege elevation failed: {0}")]
    Elevation(String),

    #[error("command execution failed: {0}")]
    CommandFailed(String),

    #[error("timed out after {0:?} waiting for device response")]
    Timeout(Duration),
}

/// Per-device backup failure, contained within one device's iteration
///
/// A write failure is kept distinct from session failures so log lines tell
/// a full disk apart from an unreachable switch.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    #[error("cannot write artifact {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
