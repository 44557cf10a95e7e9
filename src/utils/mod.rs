//! # Utilities Module
//!
//! Cross-cutting concerns shared throughout the application.
//!
//! Error types are defined here to avoid circular dependencies between the
//! `core` and `platform` modules. Fatal pre-flight errors ([`FatalError`])
//! unwind to `main`; per-device errors ([`DeviceError`]) are carried as
//! outcome values and never propagate past one device's iteration.

pub mod errors;

pub use errors::{ConfigError, DeviceError, FatalError, SessionError, WorkspaceError};
