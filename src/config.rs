//! Credential file loading
//!
//! The credential store is a sectioned key/value file read once at run
//! start: a `[switch]` table with `username`, `password` and `device_type`.
//! Any absence (file, section, field) is fatal before the first device is
//! contacted, since no backup can proceed without credentials.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::models::{Credentials, DeviceType, SecureString, Username};
use crate::utils::ConfigError;

#[derive(Debug, Deserialize)]
struct CredentialFile {
    switch: SwitchSection,
}

#[derive(Debug, Deserialize)]
struct SwitchSection {
    username: String,
    password: String,
    device_type: String,
}

/// Load the run's credential set from the file at `path`
///
/// Missing file, unparseable content, missing section/fields and empty
/// values are all [`ConfigError`]s; there is no retry and no default.
pub fn load_credentials(path: &Path) -> Result<Credentials, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed: CredentialFile = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let section = parsed.switch;
    if section.password.is_empty() {
        return Err(ConfigError::EmptyField("password"));
    }
    if section.device_type.is_empty() {
        return Err(ConfigError::EmptyField("device_type"));
    }
    let username = Username::new(section.username)?;

    Ok(Credentials::new(
        username,
        SecureString::new(section.password),
        DeviceType::new(section.device_type),
    ))
}
