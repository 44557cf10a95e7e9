//! Run-scoped backup workspace
//!
//! Every run owns one directory named after its timestamp, under a fixed
//! per-user base. All artifacts of the run land inside it; nothing else
//! writes there.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::BACKUP_DIR_NAME;
use crate::utils::WorkspaceError;

/// Default base for backup runs: `<home>/Desktop/switches_backup_data`
///
/// Falls back to the working directory when no home directory is resolvable.
pub fn default_base_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Desktop")
        .join(BACKUP_DIR_NAME)
}

/// Compute and create the run's workspace directory `<base>/<timestamp>`
///
/// Creation is recursive and idempotent: an already-existing directory is
/// not an error. Denied creation (permissions, disk full, invalid path) is
/// fatal to the run, since no artifact can be written without it.
pub fn prepare_workspace(base_dir: &Path, timestamp: &str) -> Result<PathBuf, WorkspaceError> {
    let dir = base_dir.join(timestamp);
    fs::create_dir_all(&dir).map_err(|source| WorkspaceError::Create {
        path: dir.clone(),
        source,
    })?;
    Ok(dir)
}
