//! Mock device sessions for testing without real switches
//!
//! Scripts per-address behavior so tests can exercise every failure stage of
//! the backup workflow (open, elevate, execute) and assert that no session
//! is ever opened when pre-flight checks fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::session::{DeviceSession, SessionOpener};
use crate::models::Credentials;
use crate::utils::SessionError;

/// How a mock device behaves during a backup attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockBehavior {
    /// Session opens, elevation succeeds, command returns canned config text
    Healthy,
    /// TCP/SSH open fails (unreachable host)
    Unreachable,
    /// SSH authentication is rejected
    AuthFailure,
    /// Session opens but the enable step is refused
    ElevationFailure,
    /// Session opens and elevates but the command errors out
    CommandFailure,
}

/// Session opener with scripted per-address behavior
///
/// Counts every open attempt so tests can assert that a fatal pre-flight
/// error contacted zero devices.
pub struct MockOpener {
    default_behavior: MockBehavior,
    overrides: HashMap<String, MockBehavior>,
    open_attempts: AtomicUsize,
}

impl MockOpener {
    /// Every device succeeds
    pub fn healthy() -> Self {
        Self::with_behavior(MockBehavior::Healthy)
    }

    /// Every device behaves as `default_behavior` unless overridden
    pub fn with_behavior(default_behavior: MockBehavior) -> Self {
        Self {
            default_behavior,
            overrides: HashMap::new(),
            open_attempts: AtomicUsize::new(0),
        }
    }

    /// Script one address to deviate from the default behavior
    pub fn with_override(mut self, address: &str, behavior: MockBehavior) -> Self {
        self.overrides.insert(address.to_string(), behavior);
        self
    }

    /// Number of times `open` was called, successful or not
    pub fn open_attempts(&self) -> usize {
        self.open_attempts.load(Ordering::SeqCst)
    }

    /// The configuration text a healthy mock device at `address` returns
    pub fn canned_config(address: &str) -> String {
        let host = address.rsplit('.').next().unwrap_or("0");
        format!(
            "!\nhostname switch-{host}\n!\ninterface Vlan1\n ip address {address} 255.255.255.0\n no shutdown\n!\nend\n"
        )
    }

    fn behavior_for(&self, address: &str) -> MockBehavior {
        self.overrides
            .get(address)
            .copied()
            .unwrap_or(self.default_behavior)
    }
}

impl SessionOpener for MockOpener {
    fn open(
        &self,
        address: &str,
        _credentials: &Credentials,
    ) -> Result<Box<dyn DeviceSession>, SessionError> {
        self.open_attempts.fetch_add(1, Ordering::SeqCst);

        match self.behavior_for(address) {
            MockBehavior::Unreachable => Err(SessionError::Connection(format!(
                "connect to {address}:22 timed out"
            ))),
            MockBehavior::AuthFailure => Err(SessionError::Authentication),
            behavior => Ok(Box::new(MockDeviceSession {
                address: address.to_string(),
                behavior,
            })),
        }
    }
}

/// Mock session handed out by [`MockOpener`]
#[derive(Debug)]
pub struct MockDeviceSession {
    address: String,
    behavior: MockBehavior,
}

impl DeviceSession for MockDeviceSession {
    fn address(&self) -> &str {
        &self.address
    }

    fn elevate_privilege(&mut self) -> Result<(), SessionError> {
        match self.behavior {
            MockBehavior::ElevationFailure => Err(SessionError::Elevation(
                "device rejected enable secret".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn execute(&mut self, command: &str) -> Result<String, SessionError> {
        match self.behavior {
            MockBehavior::CommandFailure => Err(SessionError::CommandFailed(format!(
                "'{command}' returned no output"
            ))),
            _ => Ok(MockOpener::canned_config(&self.address)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceType, SecureString, Username};

    fn credentials() -> Credentials {
        Credentials::new(
            Username::new("admin").unwrap(),
            SecureString::new("secret"),
            DeviceType::new("cisco_ios"),
        )
    }

    #[test]
    fn healthy_mock_round_trips_config_text() {
        let opener = MockOpener::healthy();
        let mut session = opener.open("10.2.11.7", &credentials()).unwrap();

        session.elevate_privilege().unwrap();
        let text = session.execute("show running-config").unwrap();
        assert_eq!(text, MockOpener::canned_config("10.2.11.7"));
        assert!(text.contains("hostname switch-7"));
    }

    #[test]
    fn unreachable_mock_fails_at_open() {
        let opener = MockOpener::with_behavior(MockBehavior::Unreachable);
        let err = opener.open("10.2.11.1", &credentials()).unwrap_err();
        assert!(matches!(err, SessionError::Connection(_)));
        // the attempt is still counted
        assert_eq!(opener.open_attempts(), 1);
    }

    #[test]
    fn overrides_take_precedence_over_default() {
        let opener =
            MockOpener::healthy().with_override("10.2.11.5", MockBehavior::AuthFailure);

        assert!(opener.open("10.2.11.4", &credentials()).is_ok());
        let err = opener.open("10.2.11.5", &credentials()).unwrap_err();
        assert!(matches!(err, SessionError::Authentication));
        assert_eq!(opener.open_attempts(), 2);
    }

    #[test]
    fn elevation_failure_surfaces_from_session() {
        let opener = MockOpener::with_behavior(MockBehavior::ElevationFailure);
        let mut session = opener.open("10.2.11.9", &credentials()).unwrap();
        assert!(matches!(
            session.elevate_privilege(),
            Err(SessionError::Elevation(_))
        ));
    }
}
