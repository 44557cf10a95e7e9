//! Domain model types for switchback
//!
//! SECURITY: Credential types implement Drop to clear sensitive data.

use crate::utils::ConfigError;
use std::fmt;

/// Device login username
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// Create a new username after validation
    pub fn new(username: impl Into<String>) -> Result<Self, ConfigError> {
        let username = username.into();

        if username.is_empty() {
            return Err(ConfigError::InvalidUsername(
                "username cannot be empty".to_string(),
            ));
        }

        if username.len() > 256 {
            return Err(ConfigError::InvalidUsername(
                "username exceeds maximum length (256)".to_string(),
            ));
        }

        Ok(Username(username))
    }

    /// Get the username as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Username {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Username::new(value)
    }
}

impl TryFrom<&str> for Username {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Username::new(value)
    }
}

/// Password that zeros memory on drop
///
/// SECURITY: This type never implements Display or Debug in a way that
/// reveals the password.
pub struct SecureString(String);

impl Clone for SecureString {
    fn clone(&self) -> Self {
        SecureString(self.0.clone())
    }
}

impl SecureString {
    /// Create a new secure string
    pub fn new(password: impl Into<String>) -> Self {
        SecureString(password.into())
    }

    /// Get the password as a string slice
    ///
    /// Use this sparingly and only when necessary for authentication calls.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the length of the password
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the password is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Drop for SecureString {
    fn drop(&mut self) {
        // Zero the memory
        // SAFETY: We own this String and are zeroing it before drop
        unsafe {
            let bytes = self.0.as_bytes_mut();
            for byte in bytes {
                std::ptr::write_volatile(byte, 0);
            }
        }
    }
}

impl fmt::Debug for SecureString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // SECURITY: Never reveal the password content
        write!(f, "SecureString(*** {} bytes ***)", self.0.len())
    }
}

/// Network OS platform identifier, as found in the credential file
/// (e.g. `cisco_ios`, `arista_eos`, `linux`)
///
/// Decides whether a session needs the `enable` elevation step before the
/// running configuration is readable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceType(String);

impl DeviceType {
    /// Create a device type from its configured identifier
    pub fn new(raw: impl Into<String>) -> Self {
        DeviceType(raw.into())
    }

    /// Get the identifier as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether sessions on this platform must elevate privilege before the
    /// full running configuration is readable.
    ///
    /// Plain shell targets never need it; unknown identifiers are treated as
    /// elevation-required, which is the common case for switch platforms.
    pub fn requires_elevation(&self) -> bool {
        !matches!(self.0.as_str(), "linux" | "generic")
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The credential set shared read-only by every device backup in a run
#[derive(Clone, Debug)]
pub struct Credentials {
    username: Username,
    password: SecureString,
    device_type: DeviceType,
}

impl Credentials {
    /// Create new credentials
    pub fn new(username: Username, password: SecureString, device_type: DeviceType) -> Self {
        Credentials {
            username,
            password,
            device_type,
        }
    }

    /// Get the username
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Get the password
    pub fn password(&self) -> &SecureString {
        &self.password
    }

    /// Get the device platform identifier
    pub fn device_type(&self) -> &DeviceType {
        &self.device_type
    }
}
