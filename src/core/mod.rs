//! Core backup logic (platform-agnostic)
//!
//! CRITICAL: This module MUST NOT import protocol-specific code; everything
//! here works against the session traits so tests can run on mocks.

pub mod orchestrator;
pub mod session;
pub mod targets;
pub mod worker;

// Test utilities for mock sessions (tests only)
#[cfg(test)]
pub mod mock_session;

pub use orchestrator::{run_backup, run_backup_at, RunConfig, RunSummary};
pub use session::{DeviceSession, SessionOpener};
pub use targets::{enumerate_targets, DeviceTarget};
pub use worker::{backup_device, DeviceOutcome};
