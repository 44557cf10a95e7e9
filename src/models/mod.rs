//! # Domain Models
//!
//! Core data structures representing the credential set shared by a run.
//!
//! ## Security Design
//!
//! The [`SecureString`] type provides memory-safe credential handling:
//! - Password data is zeroed on drop to prevent leakage via swap/core dumps
//! - Never exposed in `Debug` or `Display` implementations
//!
//! One credential set is loaded per run from the credential file and shared
//! read-only by every device session; it is never written back to disk or
//! logged.

pub mod credentials;

pub use credentials::{Credentials, DeviceType, SecureString, Username};
