//! Device backup worker
//!
//! Performs one device's backup end to end, in isolation from all other
//! devices: open a session, elevate if the platform requires it, capture the
//! running configuration, write the artifact. Every failure is converted
//! into a [`DeviceOutcome`] value; nothing propagates past this device.

use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::RUNNING_CONFIG_COMMAND;
use crate::core::session::SessionOpener;
use crate::core::targets::DeviceTarget;
use crate::logger;
use crate::models::Credentials;
use crate::utils::DeviceError;

/// The result of one device's backup attempt
///
/// Success carries the artifact path; failure carries the cause. The
/// orchestrator aggregates these instead of relying on error propagation.
#[derive(Debug)]
pub struct DeviceOutcome {
    target: DeviceTarget,
    result: Result<PathBuf, DeviceError>,
}

impl DeviceOutcome {
    pub fn failure(target: DeviceTarget, error: DeviceError) -> Self {
        DeviceOutcome {
            target,
            result: Err(error),
        }
    }

    pub fn address(&self) -> &str {
        self.target.address()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Artifact path on success, failure cause otherwise
    pub fn result(&self) -> Result<&Path, &DeviceError> {
        match &self.result {
            Ok(path) => Ok(path.as_path()),
            Err(err) => Err(err),
        }
    }
}

/// Back up one device: open, elevate (when the device type requires it),
/// retrieve, persist.
///
/// The session value lives in this function's scope, so its release runs on
/// every path, including failures. Exactly one session is opened per
/// invocation and at most one file is written, named
/// `{address}-{timestamp}.txt` inside the workspace (overwriting a leftover
/// of the same name).
pub fn backup_device(
    opener: &dyn SessionOpener,
    target: &DeviceTarget,
    credentials: &Credentials,
    workspace: &Path,
    timestamp: &str,
) -> DeviceOutcome {
    let result = run_backup_steps(opener, target, credentials, workspace, timestamp);

    match &result {
        Ok(path) => logger::log_info(&format!(
            "backed up {} to {}",
            target.address(),
            path.display()
        )),
        Err(err) => logger::log_error(&format!("backup of {} failed: {}", target.address(), err)),
    }

    DeviceOutcome {
        target: target.clone(),
        result,
    }
}

fn run_backup_steps(
    opener: &dyn SessionOpener,
    target: &DeviceTarget,
    credentials: &Credentials,
    workspace: &Path,
    timestamp: &str,
) -> Result<PathBuf, DeviceError> {
    let mut session = opener
        .open(target.address(), credentials)
        .map_err(DeviceError::Session)?;

    if credentials.device_type().requires_elevation() {
        session.elevate_privilege().map_err(DeviceError::Session)?;
    }

    let config_text = session
        .execute(RUNNING_CONFIG_COMMAND)
        .map_err(DeviceError::Session)?;

    let path = workspace.join(format!("{}-{}.txt", target.address(), timestamp));
    fs::write(&path, &config_text).map_err(|source| DeviceError::Write {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}
