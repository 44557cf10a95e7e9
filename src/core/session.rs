//! Remote session abstraction for device backups
//!
//! These traits allow testing without real switches by supporting mock
//! implementations. The real SSH implementation is in `src/platform/`.
//!
//! The seam is synchronous on purpose: one device's whole session lifecycle
//! (open, elevate, execute, close) runs inside a single blocking task, so a
//! backup opens exactly one network session per device.

use crate::models::Credentials;
use crate::utils::SessionError;

/// An open management session to one device
///
/// Sessions are single-use: the worker opens one, optionally elevates,
/// issues the retrieval command, and drops it. Implementations must release
/// the underlying connection on drop so the close happens on every path,
/// including failures.
pub trait DeviceSession: Send + std::fmt::Debug {
    /// Address of the device this session is connected to
    fn address(&self) -> &str;

    /// Enter privileged mode on the device
    ///
    /// A distinct step that may itself fail (wrong elevation secret, device
    /// refuses). No-op on sessions that are already privileged.
    fn elevate_privilege(&mut self) -> Result<(), SessionError>;

    /// Issue a command and capture its complete textual response
    fn execute(&mut self, command: &str) -> Result<String, SessionError>;
}

/// Opens management sessions to devices
///
/// The one seam between the backup workflow and the wire protocol: the
/// orchestrator hands a shared opener to every worker, and tests substitute
/// a mock that scripts per-address behavior.
pub trait SessionOpener: Send + Sync {
    /// Open a session to `address` using the run's credential set
    ///
    /// May fail for network, authentication, or protocol-negotiation
    /// reasons; each failure is contained to the one device being opened.
    fn open(
        &self,
        address: &str,
        credentials: &Credentials,
    ) -> Result<Box<dyn DeviceSession>, SessionError>;
}
