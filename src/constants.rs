//! # Application-Wide Constants
//!
//! Centralized configuration values and magic numbers used throughout
//! switchback. Constants live here (rather than scattered across modules) so
//! a single grep finds the definition and every use, and so the default run
//! configuration can be built from one place.

// ============================================================================
// Device Range
// ============================================================================

/// Fixed /24 prefix of the switch management subnet.
///
/// Targets are generated by appending the host octet to this prefix.
pub const SUBNET_PREFIX: &str = "10.2.11.";

/// First host octet in the backup range (inclusive).
pub const FIRST_HOST: u8 = 1;

/// Last host octet in the backup range (inclusive).
///
/// With [`FIRST_HOST`] this covers the first 100 usable hosts of the subnet.
pub const LAST_HOST: u8 = 100;

// ============================================================================
// Device Interaction
// ============================================================================

/// SSH port used for every device session.
pub const SSH_PORT: u16 = 22;

/// Command that returns the full running configuration.
pub const RUNNING_CONFIG_COMMAND: &str = "show running-config";

/// Command sent after login to turn off terminal paging.
///
/// Without this, long configurations stall on a `--More--` prompt and the
/// capture never reaches the closing prompt. Harmless on platforms that do
/// not recognize it.
pub const DISABLE_PAGING_COMMAND: &str = "terminal length 0";

/// Maximum time to establish the TCP connection to a device.
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Session-level timeout for SSH handshake and authentication (milliseconds).
pub const SSH_NEGOTIATION_TIMEOUT_MS: u32 = 10_000;

/// Poll slice for interactive channel reads (milliseconds).
///
/// Short on purpose: each read returns quickly so prompt detection and the
/// overall deadlines below stay responsive.
pub const CHANNEL_POLL_TIMEOUT_MS: u32 = 500;

/// Maximum time to wait for a device prompt (login banner, paging, enable).
pub const PROMPT_TIMEOUT_SECS: u64 = 10;

/// Maximum time to wait for the full output of the retrieval command.
///
/// Running configurations on large switches take a while to print; this
/// bounds a device that goes silent mid-transfer.
pub const COMMAND_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// Run Layout
// ============================================================================

/// Name of the per-user directory that holds all backup runs.
///
/// Composed as `<home>/Desktop/<BACKUP_DIR_NAME>/<timestamp>/`.
pub const BACKUP_DIR_NAME: &str = "switches_backup_data";

/// Timestamp format identifying a run: `MM-DD-YYYY-HH-MM-SS`.
///
/// Part of the artifact naming contract; do not change.
pub const TIMESTAMP_FORMAT: &str = "%m-%d-%Y-%H-%M-%S";

/// Credential file read from the working directory at run start.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Upper bound on devices backed up concurrently.
///
/// Devices are independent (unique artifact names, read-only shared
/// credentials), so a bounded pool is safe; 8 keeps the load on the
/// management network modest.
pub const MAX_CONCURRENT_BACKUPS: usize = 8;
